use autohost_plugin_api::{
    Host, LobbyCommand, LobbyHandler, LobbyState, LogLevel, ParamSchema, ParamSpec, Plugin,
    PluginDescriptor, PluginModule, UnloadReason, ValidatorTag, descriptor::parse_integer_range,
    lobby_handler,
};
use regex::RegexSetBuilder;
use tracing::debug;

/// `words` is untyped: a `;` separated list of forbidden words
const GLOBAL_PARAMS: &[ParamSpec] = &[ParamSpec::new("words", &[])];
const PRESET_PARAMS: &[ParamSpec] = &[ParamSpec::new(
    "immuneLevel",
    &[ValidatorTag::Integer, ValidatorTag::IntegerRange],
)];

/// Lobby synchronization callbacks and lobby states require host 0.13.35
pub const DESCRIPTOR: PluginDescriptor =
    PluginDescriptor::new("0.1", "0.13.35").with_params(ParamSchema {
        global: Some(GLOBAL_PARAMS),
        preset: Some(PRESET_PARAMS),
    });

/// Kicks users saying a forbidden word in the battle lobby
pub struct ForbiddenWordsModule;

impl PluginModule for ForbiddenWordsModule {
    fn name(&self) -> &'static str {
        "ForbiddenWords"
    }

    fn descriptor(&self) -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    fn construct(&self, host: &mut dyn Host) -> Box<dyn Plugin> {
        host.log(
            &format!("Plugin loaded (version {})", DESCRIPTOR.version),
            LogLevel::Notice,
        );

        // Otherwise registered by on_lobby_synchronized once connected
        if host.lobby_state() >= LobbyState::Synchronized {
            host.add_lobby_command_handlers(lobby_handlers());
        }

        Box::new(ForbiddenWords)
    }
}

struct ForbiddenWords;

impl Plugin for ForbiddenWords {
    fn on_lobby_synchronized(&mut self, host: &mut dyn Host) {
        // Lobby handlers do not survive a disconnect
        host.add_lobby_command_handlers(lobby_handlers());
    }

    fn on_unload(&mut self, host: &mut dyn Host, _reason: UnloadReason) {
        // A reconnect may race the unload, so remove even when not synchronized
        host.remove_lobby_command_handlers(&[LobbyCommand::SAID_BATTLE]);
        host.log("Plugin unloaded", LogLevel::Notice);
    }
}

fn lobby_handlers() -> Vec<(String, LobbyHandler)> {
    vec![(
        LobbyCommand::SAID_BATTLE.to_string(),
        lobby_handler(on_said_battle),
    )]
}

fn on_said_battle(host: &mut dyn Host, command: &LobbyCommand) {
    let (Some(user), Some(message)) = (command.arg(0), command.arg(1)) else {
        return;
    };
    let texts = host.normalize_text(&[user.clone(), message.clone()]);
    let [user, message] = texts.as_slice() else {
        return;
    };

    // Never kick ourselves
    if host.host_config().get("lobbyLogin") == Some(user.as_str()) {
        return;
    }

    if let Some(immune_level) = immune_level(host.plugin_config().get("immuneLevel"))
        && host.user_access_level(user) >= immune_level
    {
        return;
    }

    let words = host.plugin_config().get("words").unwrap_or_default().to_string();

    if let Some(word) = find_forbidden_word(message, &words) {
        debug!(target: "plugins", "ForbiddenWords: {} said forbidden word {:?}", user, word);
        host.say_battle(&format!(
            "Kicking {} from battle (watch your language!)",
            user
        ));
        host.queue_lobby_command(vec!["KICKFROMBATTLE".to_string(), user.clone()]);
    }
}

/// Integer level, or the lower bound of a `lo-hi` range
fn immune_level(value: Option<&str>) -> Option<i64> {
    let value = value?.trim();
    value.parse::<i64>().ok().or_else(|| {
        parse_integer_range(value).and_then(|(lo, _)| i64::try_from(lo).ok())
    })
}

/// First configured word appearing as a whole word in `message`, ignoring case
pub fn find_forbidden_word<'a>(message: &str, words: &'a str) -> Option<&'a str> {
    let words: Vec<&str> = words
        .split(';')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }

    let patterns = words
        .iter()
        .map(|word| format!(r"\b{}\b", regex::escape(word)));
    let set = RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .ok()?;

    // Set matches iterate in pattern order
    set.matches(message)
        .iter()
        .next()
        .and_then(|index| words.get(index).copied())
}
