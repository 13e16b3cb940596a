use std::collections::BTreeMap;

use autohost_plugin_api::{CommandHandler, LobbyHandler};
use tracing::{debug, warn};

struct OwnedCommand {
    plugin: String,
    handler: CommandHandler,
}

struct OwnedLobbyHandler {
    plugin: String,
    handler: LobbyHandler,
}

/// Handlers registered by plugins, keyed by command name
///
/// Command names are case-insensitive and owned by a single plugin. Lobby
/// commands may have one handler per plugin, dispatched in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    commands: BTreeMap<String, OwnedCommand>,
    lobby: BTreeMap<String, Vec<OwnedLobbyHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command handler for `plugin`
    ///
    /// Returns false if the command is already owned by another plugin.
    /// Re-registering from the owning plugin replaces the handler.
    pub fn add_command(&mut self, plugin: &str, name: &str, handler: CommandHandler) -> bool {
        let key = name.to_lowercase();
        if let Some(existing) = self.commands.get(&key)
            && existing.plugin != plugin
        {
            warn!(
                target: "host",
                "Plugin {} tried to register command {} already registered by {}",
                plugin, name, existing.plugin
            );
            return false;
        }

        debug!(target: "host", "Plugin {} registered command {}", plugin, key);
        self.commands.insert(
            key,
            OwnedCommand {
                plugin: plugin.to_string(),
                handler,
            },
        );
        true
    }

    /// Remove a command handler owned by `plugin`, no-op if absent
    pub fn remove_command(&mut self, plugin: &str, name: &str) -> bool {
        let key = name.to_lowercase();
        match self.commands.get(&key) {
            Some(existing) if existing.plugin == plugin => {
                self.commands.remove(&key);
                debug!(target: "host", "Plugin {} removed command {}", plugin, key);
                true
            }
            _ => false,
        }
    }

    /// Look up a command handler and the plugin owning it
    pub fn command(&self, name: &str) -> Option<(String, CommandHandler)> {
        self.commands
            .get(&name.to_lowercase())
            .map(|c| (c.plugin.clone(), c.handler.clone()))
    }

    /// Register a lobby command handler for `plugin`, replacing any previous
    /// handler the same plugin had for that lobby command
    pub fn add_lobby_handler(&mut self, plugin: &str, name: &str, handler: LobbyHandler) {
        let handlers = self.lobby.entry(name.to_string()).or_default();
        match handlers.iter_mut().find(|h| h.plugin == plugin) {
            Some(existing) => existing.handler = handler,
            None => handlers.push(OwnedLobbyHandler {
                plugin: plugin.to_string(),
                handler,
            }),
        }
        debug!(target: "host", "Plugin {} registered lobby handler {}", plugin, name);
    }

    /// Remove `plugin`'s handler for a lobby command, no-op if absent
    pub fn remove_lobby_handler(&mut self, plugin: &str, name: &str) -> bool {
        let Some(handlers) = self.lobby.get_mut(name) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|h| h.plugin != plugin);
        let removed = handlers.len() != before;

        if handlers.is_empty() {
            self.lobby.remove(name);
        }
        if removed {
            debug!(target: "host", "Plugin {} removed lobby handler {}", plugin, name);
        }
        removed
    }

    /// All handlers for a lobby command, in registration order
    pub fn lobby_handlers(&self, name: &str) -> Vec<(String, LobbyHandler)> {
        self.lobby
            .get(name)
            .map(|handlers| {
                handlers
                    .iter()
                    .map(|h| (h.plugin.clone(), h.handler.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drop every lobby handler (the lobby connection was lost)
    pub fn clear_lobby_handlers(&mut self) -> usize {
        let count = self.lobby.values().map(Vec::len).sum();
        self.lobby.clear();
        count
    }

    /// Drop everything `plugin` registered, returning how many handlers were removed
    pub fn remove_plugin(&mut self, plugin: &str) -> usize {
        let commands_before = self.commands.len();
        self.commands.retain(|_, c| c.plugin != plugin);
        let mut removed = commands_before - self.commands.len();

        for handlers in self.lobby.values_mut() {
            let before = handlers.len();
            handlers.retain(|h| h.plugin != plugin);
            removed += before - handlers.len();
        }
        self.lobby.retain(|_, handlers| !handlers.is_empty());

        removed
    }

    /// Names of the commands owned by `plugin`
    pub fn command_names(&self, plugin: &str) -> Vec<String> {
        self.commands
            .iter()
            .filter(|(_, c)| c.plugin == plugin)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of the lobby commands `plugin` handles
    pub fn lobby_handler_names(&self, plugin: &str) -> Vec<String> {
        self.lobby
            .iter()
            .filter(|(_, handlers)| handlers.iter().any(|h| h.plugin == plugin))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Total number of handlers (commands and lobby) owned by `plugin`
    pub fn handler_count(&self, plugin: &str) -> usize {
        self.command_names(plugin).len() + self.lobby_handler_names(plugin).len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.lobby.is_empty()
    }
}
