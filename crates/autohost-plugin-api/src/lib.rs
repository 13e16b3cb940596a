/// Plugin API for lobby autohost plugins
///
/// This crate provides the types and traits plugins are written against.
/// Plugins should depend on this crate, not on autohost-plugin-host.
use std::sync::Arc;

pub mod command;
pub mod config_view;
pub mod descriptor;
pub mod lobby;
pub mod log_level;
pub mod text;

pub use command::{CommandCall, CommandOutcome, CommandSource};
pub use config_view::ConfigView;
pub use descriptor::{ParamSchema, ParamSpec, PluginDescriptor, ValidatorTag};
pub use lobby::{LobbyCommand, LobbyState};
pub use log_level::LogLevel;
pub use text::BridgeText;

/// Handler for a plugin-provided command
///
/// Called with the invoking context and the command call. When
/// `call.check_only` is set the handler must only validate and must not
/// touch the host beyond read-only queries.
pub type CommandHandler = Arc<dyn Fn(&mut dyn Host, &CommandCall) -> CommandOutcome + Send + Sync>;

/// Handler for a lobby command received from the lobby server (e.g. SAIDBATTLE)
pub type LobbyHandler = Arc<dyn Fn(&mut dyn Host, &LobbyCommand) + Send + Sync>;

/// Wrap a function or closure as a [`CommandHandler`]
pub fn command_handler<F>(f: F) -> CommandHandler
where
    F: Fn(&mut dyn Host, &CommandCall) -> CommandOutcome + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a function or closure as a [`LobbyHandler`]
pub fn lobby_handler<F>(f: F) -> LobbyHandler
where
    F: Fn(&mut dyn Host, &LobbyCommand) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Capabilities the host exposes to a plugin
///
/// Every callback receives a host scoped to the calling plugin, so handler
/// registrations are always attributed to their owner.
pub trait Host {
    /// Log a message through the host's logging facility
    fn log(&mut self, message: &str, level: LogLevel);

    /// Send a private message to a lobby user
    fn say_private(&mut self, user: &str, text: &str);

    /// Send a message to the battle lobby
    fn say_battle(&mut self, text: &str);

    /// Reply on the channel a command arrived on
    fn answer(&mut self, source: &CommandSource, text: &str);

    /// Register command handlers (command name -> handler)
    fn add_command_handlers(&mut self, handlers: Vec<(String, CommandHandler)>);

    /// Remove command handlers by name, absent names are ignored
    fn remove_command_handlers(&mut self, names: &[&str]);

    /// Register lobby command handlers (lobby command name -> handler)
    fn add_lobby_command_handlers(&mut self, handlers: Vec<(String, LobbyHandler)>);

    /// Remove lobby command handlers by name, absent names are ignored
    fn remove_lobby_command_handlers(&mut self, names: &[&str]);

    /// Current state of the connection to the lobby server
    fn lobby_state(&self) -> LobbyState;

    /// Core host configuration (read-only)
    fn host_config(&self) -> &ConfigView;

    /// This plugin's configuration: global settings merged with the current preset
    fn plugin_config(&self) -> &ConfigView;

    /// Autohost access level of a lobby user
    fn user_access_level(&self, user: &str) -> i64;

    /// Queue a raw lobby command (e.g. `["KICKFROMBATTLE", user]`)
    fn queue_lobby_command(&mut self, args: Vec<String>);

    /// Normalize strings received through the host bridge
    fn normalize_text(&self, texts: &[BridgeText]) -> Vec<String> {
        texts.iter().map(BridgeText::normalize).collect()
    }
}

/// Why a plugin is being unloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadReason {
    /// Explicit unload request
    Unloaded,
    /// Unloaded as part of a reload
    Reloading,
    /// Host is shutting down
    Exiting,
}

impl std::fmt::Display for UnloadReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnloadReason::Unloaded => write!(f, "unloaded"),
            UnloadReason::Reloading => write!(f, "reloading"),
            UnloadReason::Exiting => write!(f, "exiting"),
        }
    }
}

/// Whether a private message should still go through the host's own processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFilter {
    Pass,
    Filter,
}

/// A loaded plugin instance
///
/// All hooks have no-op defaults; a plugin only overrides what it needs.
pub trait Plugin: Send + 'static {
    /// Called when the plugin is being unloaded
    fn on_unload(&mut self, _host: &mut dyn Host, _reason: UnloadReason) {}

    /// Called every time the lobby connection is (re)established and synchronized
    fn on_lobby_synchronized(&mut self, _host: &mut dyn Host) {}

    /// Called for every private message received by the host
    fn on_private_msg(
        &mut self,
        _host: &mut dyn Host,
        _user: &BridgeText,
        _message: &BridgeText,
    ) -> MessageFilter {
        MessageFilter::Pass
    }
}

/// Entry point the host uses to inspect and construct a plugin
pub trait PluginModule: Send + Sync {
    /// Unique plugin name (e.g. "ForbiddenWords")
    fn name(&self) -> &'static str;

    /// Static metadata, readable before any instance exists
    fn descriptor(&self) -> &'static PluginDescriptor;

    /// Construct a plugin instance (called once per load)
    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin>;
}
