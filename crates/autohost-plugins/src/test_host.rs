use std::collections::HashMap;

use autohost_plugin_api::{
    BridgeText, CommandHandler, CommandSource, ConfigView, Host, LobbyHandler, LobbyState,
    LogLevel,
};

/// Records everything a plugin asks for; bridge strings are trimmed on normalization
#[derive(Default)]
pub(crate) struct TrimmingHost {
    pub host_config: ConfigView,
    pub plugin_config: ConfigView,
    pub access_levels: HashMap<String, i64>,
    /// Makes `normalize_text` return nothing
    pub drop_texts: bool,
    pub logs: Vec<String>,
    pub private: Vec<(String, String)>,
    pub battle: Vec<String>,
    pub answers: Vec<(CommandSource, String)>,
    pub queued: Vec<Vec<String>>,
}

impl Host for TrimmingHost {
    fn log(&mut self, message: &str, _level: LogLevel) {
        self.logs.push(message.to_string());
    }

    fn say_private(&mut self, user: &str, text: &str) {
        self.private.push((user.to_string(), text.to_string()));
    }

    fn say_battle(&mut self, text: &str) {
        self.battle.push(text.to_string());
    }

    fn answer(&mut self, source: &CommandSource, text: &str) {
        self.answers.push((source.clone(), text.to_string()));
    }

    fn add_command_handlers(&mut self, _handlers: Vec<(String, CommandHandler)>) {}

    fn remove_command_handlers(&mut self, _names: &[&str]) {}

    fn add_lobby_command_handlers(&mut self, _handlers: Vec<(String, LobbyHandler)>) {}

    fn remove_lobby_command_handlers(&mut self, _names: &[&str]) {}

    fn lobby_state(&self) -> LobbyState {
        LobbyState::Synchronized
    }

    fn host_config(&self) -> &ConfigView {
        &self.host_config
    }

    fn plugin_config(&self) -> &ConfigView {
        &self.plugin_config
    }

    fn user_access_level(&self, user: &str) -> i64 {
        self.access_levels.get(user).copied().unwrap_or_default()
    }

    fn queue_lobby_command(&mut self, args: Vec<String>) {
        self.queued.push(args);
    }

    fn normalize_text(&self, texts: &[BridgeText]) -> Vec<String> {
        if self.drop_texts {
            return Vec::new();
        }
        texts
            .iter()
            .map(|text| text.normalize().trim().to_string())
            .collect()
    }
}
