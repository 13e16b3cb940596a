/// Tutorial and template plugins
///
/// Each plugin lives in its own module and exposes a `PluginModule` the host
/// uses to read its descriptor and construct it.
use std::sync::Arc;

use autohost_plugin_api::PluginModule;

pub mod forbidden_words;
pub mod hello_world;
pub mod templates;
pub mod time_plugin;

#[cfg(test)]
mod test_host;

pub use forbidden_words::ForbiddenWordsModule;
pub use hello_world::HelloWorldModule;
pub use templates::{MyConfigurablePluginModule, MyNewCommandPluginModule, MySimplePluginModule};
pub use time_plugin::TimePluginModule;

/// Every plugin shipped in this crate
pub fn catalog() -> Vec<Arc<dyn PluginModule>> {
    vec![
        Arc::new(HelloWorldModule),
        Arc::new(TimePluginModule),
        Arc::new(ForbiddenWordsModule),
        Arc::new(MySimplePluginModule),
        Arc::new(MyConfigurablePluginModule),
        Arc::new(MyNewCommandPluginModule),
    ]
}

/// Find a plugin by name (case-insensitive)
pub fn find(name: &str) -> Option<Arc<dyn PluginModule>> {
    catalog()
        .into_iter()
        .find(|module| module.name().eq_ignore_ascii_case(name))
}
