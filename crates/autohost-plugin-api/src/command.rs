use std::fmt;
use std::str::FromStr;

use crate::text::BridgeText;

/// Channel a command arrived on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    /// Private message
    Private,
    /// Battle lobby chat
    Battle,
    /// A lobby chat channel
    Channel(String),
    /// In-game chat
    Game,
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSource::Private => write!(f, "pv"),
            CommandSource::Battle => write!(f, "battle"),
            CommandSource::Channel(name) => write!(f, "chan:{}", name),
            CommandSource::Game => write!(f, "game"),
        }
    }
}

impl FromStr for CommandSource {
    type Err = UnknownCommandSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pv" => Ok(CommandSource::Private),
            "battle" => Ok(CommandSource::Battle),
            "game" => Ok(CommandSource::Game),
            _ => match s.strip_prefix("chan:") {
                Some(name) if !name.is_empty() => Ok(CommandSource::Channel(name.to_string())),
                _ => Err(UnknownCommandSource(s.to_string())),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command source: {0} (expected pv, battle, game or chan:<name>)")]
pub struct UnknownCommandSource(pub String);

/// A single invocation of a plugin command
#[derive(Debug, Clone)]
pub struct CommandCall {
    pub source: CommandSource,
    pub user: BridgeText,
    pub params: Vec<BridgeText>,
    /// Pre-flight validation only (e.g. the command is the target of a vote)
    pub check_only: bool,
}

/// Result of a command handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Check passed, the command may be executed
    Accepted,
    /// Check failed, the command must not be executed
    Rejected,
    /// The command was executed
    Executed,
}

impl CommandOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CommandOutcome::Accepted | CommandOutcome::Executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert_eq!("pv".parse::<CommandSource>(), Ok(CommandSource::Private));
        assert_eq!("battle".parse::<CommandSource>(), Ok(CommandSource::Battle));
        assert_eq!(
            "chan:main".parse::<CommandSource>(),
            Ok(CommandSource::Channel("main".to_string()))
        );
        assert!("chan:".parse::<CommandSource>().is_err());
        assert!("lobby".parse::<CommandSource>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        let source = CommandSource::Channel("autohosts".to_string());
        assert_eq!(source.to_string().parse::<CommandSource>(), Ok(source));
    }

    #[test]
    fn test_rejected_is_not_accepted() {
        assert!(CommandOutcome::Accepted.is_accepted());
        assert!(CommandOutcome::Executed.is_accepted());
        assert!(!CommandOutcome::Rejected.is_accepted());
    }
}
