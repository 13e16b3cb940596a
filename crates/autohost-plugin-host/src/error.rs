use crate::validation::ParamGroup;

/// Errors returned by the plugin runner
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Plugin {0} is already loaded")]
    AlreadyLoaded(String),

    #[error("Plugin {0} is not loaded")]
    NotLoaded(String),

    #[error("Plugin {plugin} requires host version {required} (running {host})")]
    IncompatibleVersion {
        plugin: String,
        required: String,
        host: String,
    },

    #[error("Invalid version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Plugin {plugin}: missing {group} setting {setting}")]
    MissingSetting {
        plugin: String,
        group: ParamGroup,
        setting: String,
    },

    #[error("Plugin {plugin}: invalid value {value:?} for {group} setting {setting} (expected {expected})")]
    InvalidSetting {
        plugin: String,
        group: ParamGroup,
        setting: String,
        value: String,
        expected: String,
    },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Handler for {0} panicked")]
    HandlerPanicked(String),
}
