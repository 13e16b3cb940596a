/// Host runtime for loading plugins and dispatching events to them
///
/// This crate drives plugin lifecycles (load, unload, lobby synchronization)
/// and routes commands and lobby events to the handlers plugins register.
/// Plugins should depend on autohost-plugin-api, not this crate.
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod logging;
pub mod plugin_runner;
pub mod registry;
pub mod validation;
pub mod version;

pub use config::{AutohostConfig, ConfigLoadError, HostSettings, LobbyHandlerPolicy, PluginSettings};
pub use context::{HostAction, HostContext, HostState};
pub use error::HostError;
pub use events::HostEvent;
pub use logging::init_logging;
pub use plugin_runner::{PluginRunner, PluginState};
pub use registry::HandlerRegistry;
