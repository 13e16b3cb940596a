use serde::{Deserialize, Serialize};

use autohost_plugin_api::ConfigView;

/// Host version reported to plugins when none is configured
pub const DEFAULT_HOST_VERSION: &str = "0.13.35";

/// What happens to lobby command handlers when the lobby connection drops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LobbyHandlerPolicy {
    /// All lobby handlers are dropped, plugins re-register on synchronization
    #[default]
    ClearOnDisconnect,
    /// Lobby handlers survive the disconnect
    Retain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSettings {
    /// Host version plugins are checked against
    #[serde(default = "default_version")]
    pub version: String,

    /// Login the host uses on the lobby server
    #[serde(default = "default_lobby_login")]
    pub lobby_login: String,

    /// Handling of lobby handlers on disconnect
    #[serde(default)]
    pub lobby_handler_policy: LobbyHandlerPolicy,

    /// Active preset
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Access level of users without an explicit entry
    #[serde(default)]
    pub default_access_level: i64,
}

fn default_version() -> String {
    DEFAULT_HOST_VERSION.to_string()
}

fn default_lobby_login() -> String {
    "Autohost".to_string()
}

fn default_preset() -> String {
    "default".to_string()
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            lobby_login: default_lobby_login(),
            lobby_handler_policy: LobbyHandlerPolicy::default(),
            preset: default_preset(),
            default_access_level: 0,
        }
    }
}

impl HostSettings {
    /// Core host configuration as seen by plugins
    pub fn to_view(&self) -> ConfigView {
        [
            ("lobbyLogin", self.lobby_login.as_str()),
            ("preset", self.preset.as_str()),
            ("version", self.version.as_str()),
        ]
        .into_iter()
        .collect()
    }
}
