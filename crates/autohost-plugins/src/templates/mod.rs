//! Starting points for new plugins: a minimal plugin, a configurable plugin
//! and a plugin adding a command.

pub mod my_configurable_plugin;
pub mod my_new_command_plugin;
pub mod my_simple_plugin;

pub use my_configurable_plugin::MyConfigurablePluginModule;
pub use my_new_command_plugin::MyNewCommandPluginModule;
pub use my_simple_plugin::MySimplePluginModule;
