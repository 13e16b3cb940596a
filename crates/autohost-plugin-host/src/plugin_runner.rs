use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use autohost_plugin_api::{
    BridgeText, CommandCall, CommandOutcome, CommandSource, ConfigView, Host, LobbyCommand,
    LobbyState, MessageFilter, Plugin, PluginDescriptor, PluginModule, UnloadReason,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::config::{AutohostConfig, HostSettings, LobbyHandlerPolicy, PluginSettings};
use crate::context::{HostAction, HostContext, HostState};
use crate::error::HostError;
use crate::events::HostEvent;
use crate::registry::HandlerRegistry;
use crate::validation::validate_plugin_config;
use crate::version::check_compatibility;

/// Lifecycle state of a plugin as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Not loaded
    Unloaded,
    /// Loaded, no lobby handlers registered
    Loaded,
    /// Lobby handlers registered and the lobby is synchronized
    HandlersActive,
    /// Lobby handlers dropped or idle because the lobby connection was lost
    HandlersInactive,
}

struct LoadedPlugin {
    name: &'static str,
    descriptor: &'static PluginDescriptor,
    instance: Box<dyn Plugin>,
    /// Global settings merged with the current preset
    config: ConfigView,
    state: PluginState,
}

/// Loads plugins and dispatches host events to them
pub struct PluginRunner {
    plugins: Vec<LoadedPlugin>,
    registry: HandlerRegistry,
    state: HostState,
    settings: HostSettings,
    plugin_settings: BTreeMap<String, PluginSettings>,
    action_tx: UnboundedSender<HostAction>,
}

impl PluginRunner {
    /// Create a runner with default host settings
    pub fn new(action_tx: UnboundedSender<HostAction>) -> Self {
        Self::with_settings(HostSettings::default(), action_tx)
    }

    pub fn with_settings(settings: HostSettings, action_tx: UnboundedSender<HostAction>) -> Self {
        let mut state = HostState::new(settings.to_view());
        state.default_access_level = settings.default_access_level;

        Self {
            plugins: Vec::new(),
            registry: HandlerRegistry::new(),
            state,
            settings,
            plugin_settings: BTreeMap::new(),
            action_tx,
        }
    }

    /// Create a runner from a loaded config (plugins are not loaded yet)
    pub fn from_config(config: &AutohostConfig, action_tx: UnboundedSender<HostAction>) -> Self {
        let mut runner = Self::with_settings(config.host.clone(), action_tx);
        for (user, level) in &config.users {
            runner.set_user_access_level(user, *level);
        }
        for (name, settings) in &config.plugins {
            runner.set_plugin_settings(name, settings.clone());
        }
        runner
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn lobby_state(&self) -> LobbyState {
        self.state.lobby_state
    }

    pub fn set_user_access_level(&mut self, user: &str, level: i64) {
        self.state.access_levels.insert(user.to_string(), level);
    }

    /// Settings used the next time `name` is loaded
    pub fn set_plugin_settings(&mut self, name: &str, settings: PluginSettings) {
        self.plugin_settings.insert(name.to_string(), settings);
    }

    /// Switch preset, loaded plugins see the new preset settings from their next callback on
    pub fn set_preset(&mut self, preset: &str) {
        info!(target: "host", "Switching preset {} -> {}", self.settings.preset, preset);
        self.settings.preset = preset.to_string();
        self.state.host_config = self.settings.to_view();

        for plugin in &mut self.plugins {
            let (global, preset_values) = self
                .plugin_settings
                .get(plugin.name)
                .map(|s| (s.global_view(), s.preset_view(&self.settings.preset)))
                .unwrap_or_default();

            if let Err(e) = validate_plugin_config(
                plugin.name,
                &plugin.descriptor.params,
                &global,
                &preset_values,
            ) {
                warn!(target: "host", "{}", e);
            }
            plugin.config = global.merged_with(&preset_values);
        }
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name).collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name == name)
    }

    pub fn plugin_state(&self, name: &str) -> PluginState {
        self.plugins
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.state)
            .unwrap_or(PluginState::Unloaded)
    }

    /// Load a plugin
    ///
    /// Checks version compatibility and the plugin's declared settings before
    /// constructing it.
    pub fn load_plugin(&mut self, module: Arc<dyn PluginModule>) -> Result<(), HostError> {
        let name = module.name();
        if self.is_loaded(name) {
            return Err(HostError::AlreadyLoaded(name.to_string()));
        }

        let descriptor = module.descriptor();
        check_compatibility(name, &self.settings.version, descriptor.required_host_version)?;

        let (global, preset) = self
            .plugin_settings
            .get(name)
            .map(|s| (s.global_view(), s.preset_view(&self.settings.preset)))
            .unwrap_or_default();
        validate_plugin_config(name, &descriptor.params, &global, &preset)?;
        let config = global.merged_with(&preset);

        debug!(target: "host", "Constructing plugin {} (version {})", name, descriptor.version);
        let instance = guarded(
            name,
            "load",
            &mut self.registry,
            &self.state,
            &config,
            &self.action_tx,
            |host| module.construct(host),
        );

        let Some(instance) = instance else {
            self.registry.remove_plugin(name);
            return Err(HostError::HandlerPanicked(name.to_string()));
        };

        let mut plugin = LoadedPlugin {
            name,
            descriptor,
            instance,
            config,
            state: PluginState::Loaded,
        };
        plugin.state = self.derive_state(&plugin);
        self.plugins.push(plugin);

        info!(target: "host", "Loaded plugin {} (version {})", name, descriptor.version);
        Ok(())
    }

    /// Unload a plugin, removing anything it left registered
    pub fn unload_plugin(&mut self, name: &str, reason: UnloadReason) -> Result<(), HostError> {
        let Some(index) = self.plugins.iter().position(|p| p.name == name) else {
            return Err(HostError::NotLoaded(name.to_string()));
        };

        let mut plugin = self.plugins.remove(index);
        guarded(
            plugin.name,
            "unload",
            &mut self.registry,
            &self.state,
            &plugin.config,
            &self.action_tx,
            |host| plugin.instance.on_unload(host, reason),
        );

        let leftover = self.registry.remove_plugin(plugin.name);
        if leftover > 0 {
            warn!(
                target: "host",
                "Plugin {} left {} handler(s) registered on unload, removing them",
                plugin.name, leftover
            );
        }

        info!(target: "host", "Unloaded plugin {} ({})", plugin.name, reason);
        Ok(())
    }

    /// Unload every plugin, most recently loaded first
    pub fn unload_all(&mut self, reason: UnloadReason) {
        let names: Vec<&'static str> = self.plugins.iter().rev().map(|p| p.name).collect();
        for name in names {
            if let Err(e) = self.unload_plugin(name, reason) {
                warn!(target: "host", "{}", e);
            }
        }
    }

    /// Update the lobby connection state
    ///
    /// Losing the connection drops lobby handlers according to the configured
    /// policy. Reaching `Synchronized` notifies every plugin so it can
    /// (re-)register its lobby handlers.
    pub fn set_lobby_state(&mut self, new_state: LobbyState) {
        let old_state = self.state.lobby_state;
        if old_state == new_state {
            return;
        }

        info!(target: "host", "Lobby state {:?} -> {:?}", old_state, new_state);
        self.state.lobby_state = new_state;

        if new_state == LobbyState::Disconnected
            && self.settings.lobby_handler_policy == LobbyHandlerPolicy::ClearOnDisconnect
        {
            let cleared = self.registry.clear_lobby_handlers();
            debug!(target: "host", "Cleared {} lobby handler(s) on disconnect", cleared);
        }

        if !old_state.is_synchronized() && new_state.is_synchronized() {
            for plugin in &mut self.plugins {
                guarded(
                    plugin.name,
                    "lobby synchronization",
                    &mut self.registry,
                    &self.state,
                    &plugin.config,
                    &self.action_tx,
                    |host| plugin.instance.on_lobby_synchronized(host),
                );
            }
        }

        self.refresh_states();
    }

    /// Run a command for real
    pub fn execute_command(
        &mut self,
        source: CommandSource,
        user: impl Into<BridgeText>,
        name: &str,
        params: Vec<BridgeText>,
    ) -> Result<CommandOutcome, HostError> {
        let call = CommandCall {
            source,
            user: user.into(),
            params,
            check_only: false,
        };
        self.invoke_command(name, &call)
    }

    /// Pre-flight check of a command that is the target of a vote
    pub fn check_command(
        &mut self,
        user: impl Into<BridgeText>,
        name: &str,
        params: Vec<BridgeText>,
    ) -> Result<bool, HostError> {
        let call = CommandCall {
            source: CommandSource::Battle,
            user: user.into(),
            params,
            check_only: true,
        };
        Ok(self.invoke_command(name, &call)?.is_accepted())
    }

    fn invoke_command(&mut self, name: &str, call: &CommandCall) -> Result<CommandOutcome, HostError> {
        let Some((owner, handler)) = self.registry.command(name) else {
            return Err(HostError::UnknownCommand(name.to_string()));
        };
        let Some(plugin) = self.plugins.iter().find(|p| p.name == owner) else {
            return Err(HostError::NotLoaded(owner));
        };

        debug!(
            target: "host",
            "Dispatching command {} to {} (check only: {})",
            name, plugin.name, call.check_only
        );
        let outcome = guarded(
            plugin.name,
            name,
            &mut self.registry,
            &self.state,
            &plugin.config,
            &self.action_tx,
            |host| handler(host, call),
        )
        .ok_or_else(|| HostError::HandlerPanicked(name.to_string()))?;

        self.refresh_states();
        Ok(outcome)
    }

    /// Dispatch a lobby command to every handler registered for it
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch_lobby_command(&mut self, command: &LobbyCommand) -> usize {
        if !self.state.lobby_state.is_synchronized() {
            debug!(target: "host", "Ignoring lobby command {} while not synchronized", command.name);
            return 0;
        }

        let handlers = self.registry.lobby_handlers(&command.name);
        let mut invoked = 0;

        for (owner, handler) in handlers {
            let Some(plugin) = self.plugins.iter().find(|p| p.name == owner) else {
                continue;
            };

            guarded(
                plugin.name,
                &command.name,
                &mut self.registry,
                &self.state,
                &plugin.config,
                &self.action_tx,
                |host| handler(host, command),
            );
            invoked += 1;
        }

        self.refresh_states();
        invoked
    }

    /// Offer a private message to every plugin
    pub fn dispatch_private_message(
        &mut self,
        user: &BridgeText,
        message: &BridgeText,
    ) -> MessageFilter {
        let mut filter = MessageFilter::Pass;

        for plugin in &mut self.plugins {
            let result = guarded(
                plugin.name,
                "private message",
                &mut self.registry,
                &self.state,
                &plugin.config,
                &self.action_tx,
                |host| plugin.instance.on_private_msg(host, user, message),
            );
            if result == Some(MessageFilter::Filter) {
                filter = MessageFilter::Filter;
            }
        }

        self.refresh_states();
        filter
    }

    /// Route a host event to the matching dispatch method
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::LobbyStateChanged(state) => self.set_lobby_state(state),
            HostEvent::LobbyCommand(command) => {
                let invoked = self.dispatch_lobby_command(&command);
                debug!(target: "host", "Lobby command {} handled by {} plugin(s)", command.name, invoked);
            }
            HostEvent::PrivateMessage { user, message } => {
                self.dispatch_private_message(&user, &message);
            }
            HostEvent::Command {
                source,
                user,
                name,
                params,
            } => match self.execute_command(source, user, &name, params) {
                Ok(outcome) => debug!(target: "host", "Command {} -> {:?}", name, outcome),
                Err(e) => warn!(target: "host", "{}", e),
            },
            HostEvent::VoteCheck { user, name, params } => {
                match self.check_command(user, &name, params) {
                    Ok(accepted) => info!(target: "host", "Vote check for {}: {}", name, accepted),
                    Err(e) => warn!(target: "host", "{}", e),
                }
            }
        }
    }

    fn derive_state(&self, plugin: &LoadedPlugin) -> PluginState {
        let has_lobby_handlers = !self.registry.lobby_handler_names(plugin.name).is_empty();
        let synchronized = self.state.lobby_state.is_synchronized();

        match (has_lobby_handlers, synchronized) {
            (true, true) => PluginState::HandlersActive,
            (true, false) => PluginState::HandlersInactive,
            (false, false)
                if matches!(
                    plugin.state,
                    PluginState::HandlersActive | PluginState::HandlersInactive
                ) =>
            {
                PluginState::HandlersInactive
            }
            _ => PluginState::Loaded,
        }
    }

    fn refresh_states(&mut self) {
        let states: Vec<PluginState> = self.plugins.iter().map(|p| self.derive_state(p)).collect();
        for (plugin, state) in self.plugins.iter_mut().zip(states) {
            if plugin.state != state {
                debug!(target: "host", "Plugin {} state {:?} -> {:?}", plugin.name, plugin.state, state);
                plugin.state = state;
            }
        }
    }
}

impl Drop for PluginRunner {
    fn drop(&mut self) {
        self.unload_all(UnloadReason::Exiting);
    }
}

/// Run one plugin callback with a context scoped to `plugin`, containing panics
fn guarded<R>(
    plugin: &str,
    what: &str,
    registry: &mut HandlerRegistry,
    state: &HostState,
    config: &ConfigView,
    action_tx: &UnboundedSender<HostAction>,
    f: impl FnOnce(&mut dyn Host) -> R,
) -> Option<R> {
    let mut ctx = HostContext::new(plugin, registry, state, config, action_tx);

    match panic::catch_unwind(AssertUnwindSafe(|| {
        let host: &mut dyn Host = &mut ctx;
        f(host)
    })) {
        Ok(result) => Some(result),
        Err(payload) => {
            error!(
                target: "host",
                "Plugin {} panicked during {}: {}",
                plugin,
                what,
                panic_message(&*payload)
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
