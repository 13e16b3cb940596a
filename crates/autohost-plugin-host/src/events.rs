use autohost_plugin_api::{BridgeText, CommandSource, LobbyCommand, LobbyState};

/// Something that happened on the host side and must reach the plugins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The lobby connection changed state
    LobbyStateChanged(LobbyState),
    /// A command was received from the lobby server
    LobbyCommand(LobbyCommand),
    /// A user sent the host a private message
    PrivateMessage {
        user: BridgeText,
        message: BridgeText,
    },
    /// A user invoked a command
    Command {
        source: CommandSource,
        user: BridgeText,
        name: String,
        params: Vec<BridgeText>,
    },
    /// A user called a vote for a command, only the pre-flight check runs
    VoteCheck {
        user: BridgeText,
        name: String,
        params: Vec<BridgeText>,
    },
}
