use crate::text::BridgeText;

/// State of the host's connection to the lobby server, ordered by progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LobbyState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    LoggedIn = 3,
    /// Connected, logged in, and all initial lobby commands received
    Synchronized = 4,
}

impl LobbyState {
    pub fn is_synchronized(&self) -> bool {
        *self >= LobbyState::Synchronized
    }
}

/// A command received from the lobby server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyCommand {
    pub name: String,
    pub args: Vec<BridgeText>,
}

impl LobbyCommand {
    /// Somebody said something in the battle lobby
    pub const SAID_BATTLE: &'static str = "SAIDBATTLE";

    pub fn new(name: impl Into<String>, args: Vec<BridgeText>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn said_battle(user: impl Into<BridgeText>, message: impl Into<BridgeText>) -> Self {
        Self::new(Self::SAID_BATTLE, vec![user.into(), message.into()])
    }

    pub fn arg(&self, index: usize) -> Option<&BridgeText> {
        self.args.get(index)
    }
}
