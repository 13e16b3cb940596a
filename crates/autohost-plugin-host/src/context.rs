use std::collections::HashMap;

use autohost_plugin_api::{
    CommandHandler, CommandSource, ConfigView, Host, LobbyHandler, LobbyState, LogLevel,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::registry::HandlerRegistry;

/// Something a plugin asked the host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// Log entry emitted by a plugin
    Log {
        plugin: String,
        level: LogLevel,
        message: String,
    },
    /// Private message to a lobby user
    SayPrivate { user: String, text: String },
    /// Message to the battle lobby
    SayBattle { text: String },
    /// Reply on the channel a command arrived on
    Answer { source: CommandSource, text: String },
    /// Raw lobby command to send to the server
    QueueLobbyCommand { args: Vec<String> },
}

impl HostAction {
    /// Whether this action is visible outside the host (anything but a log entry)
    pub fn is_side_effect(&self) -> bool {
        !matches!(self, HostAction::Log { .. })
    }
}

/// Host-wide state plugins can query
#[derive(Debug, Clone)]
pub struct HostState {
    /// Current lobby connection state
    pub lobby_state: LobbyState,
    /// Core host configuration view
    pub host_config: ConfigView,
    /// Autohost access level per lobby user
    pub access_levels: HashMap<String, i64>,
    /// Access level of users not listed in `access_levels`
    pub default_access_level: i64,
}

impl HostState {
    pub fn new(host_config: ConfigView) -> Self {
        Self {
            lobby_state: LobbyState::Disconnected,
            host_config,
            access_levels: HashMap::new(),
            default_access_level: 0,
        }
    }

    pub fn access_level(&self, user: &str) -> i64 {
        self.access_levels
            .get(user)
            .copied()
            .unwrap_or(self.default_access_level)
    }
}

/// Host capabilities handed to a plugin for the duration of one callback
///
/// Every registration made through this context is attributed to `plugin`.
pub struct HostContext<'a> {
    plugin: &'a str,
    registry: &'a mut HandlerRegistry,
    state: &'a HostState,
    plugin_config: &'a ConfigView,
    action_tx: &'a UnboundedSender<HostAction>,
}

impl<'a> HostContext<'a> {
    pub(crate) fn new(
        plugin: &'a str,
        registry: &'a mut HandlerRegistry,
        state: &'a HostState,
        plugin_config: &'a ConfigView,
        action_tx: &'a UnboundedSender<HostAction>,
    ) -> Self {
        Self {
            plugin,
            registry,
            state,
            plugin_config,
            action_tx,
        }
    }

    fn send(&self, action: HostAction) {
        let _ = self.action_tx.send(action);
    }
}

impl Host for HostContext<'_> {
    fn log(&mut self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Critical | LogLevel::Error => {
                error!(target: "plugins", plugin = self.plugin, "{}", message)
            }
            LogLevel::Warning => warn!(target: "plugins", plugin = self.plugin, "{}", message),
            LogLevel::Notice | LogLevel::Info => {
                info!(target: "plugins", plugin = self.plugin, "{}", message)
            }
            LogLevel::Debug => debug!(target: "plugins", plugin = self.plugin, "{}", message),
        }

        self.send(HostAction::Log {
            plugin: self.plugin.to_string(),
            level,
            message: message.to_string(),
        });
    }

    fn say_private(&mut self, user: &str, text: &str) {
        self.send(HostAction::SayPrivate {
            user: user.to_string(),
            text: text.to_string(),
        });
    }

    fn say_battle(&mut self, text: &str) {
        self.send(HostAction::SayBattle {
            text: text.to_string(),
        });
    }

    fn answer(&mut self, source: &CommandSource, text: &str) {
        self.send(HostAction::Answer {
            source: source.clone(),
            text: text.to_string(),
        });
    }

    fn add_command_handlers(&mut self, handlers: Vec<(String, CommandHandler)>) {
        for (name, handler) in handlers {
            self.registry.add_command(self.plugin, &name, handler);
        }
    }

    fn remove_command_handlers(&mut self, names: &[&str]) {
        for name in names {
            self.registry.remove_command(self.plugin, name);
        }
    }

    fn add_lobby_command_handlers(&mut self, handlers: Vec<(String, LobbyHandler)>) {
        for (name, handler) in handlers {
            self.registry.add_lobby_handler(self.plugin, &name, handler);
        }
    }

    fn remove_lobby_command_handlers(&mut self, names: &[&str]) {
        for name in names {
            self.registry.remove_lobby_handler(self.plugin, name);
        }
    }

    fn lobby_state(&self) -> LobbyState {
        self.state.lobby_state
    }

    fn host_config(&self) -> &ConfigView {
        &self.state.host_config
    }

    fn plugin_config(&self) -> &ConfigView {
        self.plugin_config
    }

    fn user_access_level(&self, user: &str) -> i64 {
        self.state.access_level(user)
    }

    fn queue_lobby_command(&mut self, args: Vec<String>) {
        debug!(target: "host", "Plugin {} queued lobby command {:?}", self.plugin, args);
        self.send(HostAction::QueueLobbyCommand { args });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autohost_plugin_api::{BridgeText, CommandOutcome, command_handler};
    use tokio::sync::mpsc;

    #[test]
    fn test_registrations_are_attributed_to_plugin() {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let mut registry = HandlerRegistry::new();
        let state = HostState::new(ConfigView::default());
        let config = ConfigView::default();

        let mut ctx = HostContext::new("TimePlugin", &mut registry, &state, &config, &action_tx);
        ctx.add_command_handlers(vec![(
            "time".to_string(),
            command_handler(|_, _| CommandOutcome::Executed),
        )]);

        assert_eq!(registry.command_names("TimePlugin"), vec!["time"]);
    }

    #[test]
    fn test_log_emits_action() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut registry = HandlerRegistry::new();
        let state = HostState::new(ConfigView::default());
        let config = ConfigView::default();

        let mut ctx = HostContext::new("HelloWorld", &mut registry, &state, &config, &action_tx);
        ctx.log("Plugin loaded (version 0.1)", LogLevel::Notice);
        ctx.say_battle("hi");

        let first = action_rx.try_recv().expect("log action");
        assert!(!first.is_side_effect());
        assert_eq!(
            first,
            HostAction::Log {
                plugin: "HelloWorld".to_string(),
                level: LogLevel::Notice,
                message: "Plugin loaded (version 0.1)".to_string(),
            }
        );
        assert!(action_rx.try_recv().expect("say action").is_side_effect());
    }

    #[test]
    fn test_access_level_defaults() {
        let mut state = HostState::new(ConfigView::default());
        state.access_levels.insert("Admin".to_string(), 100);
        state.default_access_level = 10;

        assert_eq!(state.access_level("Admin"), 100);
        assert_eq!(state.access_level("Guest"), 10);
    }

    #[test]
    fn test_normalize_text_default() {
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let mut registry = HandlerRegistry::new();
        let state = HostState::new(ConfigView::default());
        let config = ConfigView::default();
        let ctx = HostContext::new("HelloWorld", &mut registry, &state, &config, &action_tx);

        let normalized = ctx.normalize_text(&[BridgeText::from("a"), BridgeText::from(&b"b"[..])]);
        assert_eq!(normalized, vec!["a", "b"]);
    }
}
