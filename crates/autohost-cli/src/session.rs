//! Session scripts: one host event or control command per line

use autohost_plugin_api::{
    BridgeText, CommandSource, LobbyCommand, LobbyState, command::UnknownCommandSource,
};
use autohost_plugin_host::HostEvent;

/// One parsed session line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Forwarded to the plugin runner as is
    Event(HostEvent),
    SetAccessLevel { user: String, level: i64 },
    SetPreset(String),
    Load(String),
    Unload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionParseError {
    #[error("unknown session command: {0}")]
    UnknownCommand(String),
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error(transparent)]
    InvalidSource(#[from] UnknownCommandSource),
    #[error("invalid access level: {0}")]
    InvalidLevel(String),
}

/// Parse a session line, `None` for blank lines and `#` comments
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, SessionParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = split_word(line);
    let command = match keyword.to_ascii_lowercase().as_str() {
        "connect" => SessionCommand::Event(HostEvent::LobbyStateChanged(LobbyState::Synchronized)),
        "disconnect" => {
            SessionCommand::Event(HostEvent::LobbyStateChanged(LobbyState::Disconnected))
        }
        "said" => {
            let (user, message) = split_word(rest);
            let user = required("said", "user", user)?;
            SessionCommand::Event(HostEvent::LobbyCommand(LobbyCommand::said_battle(
                user, message,
            )))
        }
        "pm" => {
            let (user, message) = split_word(rest);
            let user = required("pm", "user", user)?;
            SessionCommand::Event(HostEvent::PrivateMessage {
                user: user.into(),
                message: message.into(),
            })
        }
        "cmd" => {
            let mut words = rest.split_whitespace();
            let source = required("cmd", "source", words.next().unwrap_or_default())?;
            let source: CommandSource = source.parse()?;
            let user = required("cmd", "user", words.next().unwrap_or_default())?;
            let name = required("cmd", "command", words.next().unwrap_or_default())?;
            SessionCommand::Event(HostEvent::Command {
                source,
                user: user.into(),
                name: name.to_string(),
                params: words.map(BridgeText::from).collect(),
            })
        }
        "vote" => {
            let mut words = rest.split_whitespace();
            let user = required("vote", "user", words.next().unwrap_or_default())?;
            let name = required("vote", "command", words.next().unwrap_or_default())?;
            SessionCommand::Event(HostEvent::VoteCheck {
                user: user.into(),
                name: name.to_string(),
                params: words.map(BridgeText::from).collect(),
            })
        }
        "level" => {
            let (user, level) = split_word(rest);
            let user = required("level", "user", user)?;
            let level = required("level", "level", level)?;
            let level = level
                .parse()
                .map_err(|_| SessionParseError::InvalidLevel(level.to_string()))?;
            SessionCommand::SetAccessLevel {
                user: user.to_string(),
                level,
            }
        }
        "preset" => SessionCommand::SetPreset(required("preset", "name", rest)?.to_string()),
        "load" => SessionCommand::Load(required("load", "plugin", rest)?.to_string()),
        "unload" => SessionCommand::Unload(required("unload", "plugin", rest)?.to_string()),
        _ => return Err(SessionParseError::UnknownCommand(keyword.to_string())),
    };

    Ok(Some(command))
}

/// First word and the remainder with its leading whitespace removed
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    value: &'a str,
) -> Result<&'a str, SessionParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SessionParseError::MissingArgument { command, argument });
    }
    Ok(value)
}
