pub mod autohost_config;
pub mod host_settings;
pub mod paths;
pub mod plugin_settings;

pub use autohost_config::{AutohostConfig, ConfigLoadError};
pub use host_settings::{HostSettings, LobbyHandlerPolicy};
pub use paths::ProjectPaths;
pub use plugin_settings::PluginSettings;
