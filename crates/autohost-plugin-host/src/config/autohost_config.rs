use std::{collections::BTreeMap, fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{host_settings::HostSettings, paths::ProjectPaths, plugin_settings::PluginSettings};

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("IO error on config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutohostConfig {
    /// Host core settings
    #[serde(default)]
    pub host: HostSettings,

    /// Autohost access level per lobby user
    #[serde(default)]
    pub users: BTreeMap<String, i64>,

    /// Per-plugin configuration (plugin name -> settings)
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginSettings>,
}

impl AutohostConfig {
    /// Default location: `<config dir>/autohost/config.toml`
    pub fn config_path() -> Result<PathBuf, ConfigLoadError> {
        let paths = ProjectPaths::new("autohost").ok_or(ConfigLoadError::NoConfigDir)?;
        Ok(paths.config_dir().join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigLoadError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self)?;
        fs::write(path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Names of the plugins enabled in this config
    pub fn enabled_plugins(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .filter(|(_, settings)| settings.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LobbyHandlerPolicy;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"
[host]
version = "0.13.35"
lobby_login = "MyAutohost"
lobby_handler_policy = "retain"

[users]
Alice = 100

[plugins.ForbiddenWords.global]
words = "foo;bar"

[plugins.ForbiddenWords.presets.default]
immuneLevel = 100

[plugins.TimePlugin]
enabled = false
"#;

    #[test]
    fn test_parse_example() {
        let config: AutohostConfig = toml::from_str(EXAMPLE).expect("valid config");

        assert_eq!(config.host.lobby_login, "MyAutohost");
        assert_eq!(config.host.preset, "default");
        assert_eq!(config.host.lobby_handler_policy, LobbyHandlerPolicy::Retain);
        assert_eq!(config.users.get("Alice"), Some(&100));

        let fw = &config.plugins["ForbiddenWords"];
        assert_eq!(fw.global_view().get("words"), Some("foo;bar"));
        assert_eq!(fw.preset_view("default").get("immuneLevel"), Some("100"));
        assert_eq!(config.enabled_plugins(), vec!["ForbiddenWords"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AutohostConfig = toml::from_str("").expect("valid config");
        assert_eq!(config.host.lobby_handler_policy, LobbyHandlerPolicy::ClearOnDisconnect);
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let config: AutohostConfig = toml::from_str(EXAMPLE).expect("valid config");
        config.save_to(&path).expect("save");

        let loaded = AutohostConfig::load_from(&path).expect("load");
        assert_eq!(loaded.host.lobby_login, "MyAutohost");
        assert_eq!(loaded.plugins.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let err = AutohostConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigLoadError::NotFound(_)));
    }
}
