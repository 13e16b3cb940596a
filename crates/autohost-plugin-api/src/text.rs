/// A string as received through the host bridge
///
/// Depending on the bridge, strings may arrive as raw bytes instead of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BridgeText {
    Text(String),
    Bytes(Vec<u8>),
}

impl BridgeText {
    /// Canonical text form, invalid UTF-8 is replaced
    pub fn normalize(&self) -> String {
        match self {
            BridgeText::Text(s) => s.clone(),
            BridgeText::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl From<&str> for BridgeText {
    fn from(s: &str) -> Self {
        BridgeText::Text(s.to_string())
    }
}

impl From<String> for BridgeText {
    fn from(s: String) -> Self {
        BridgeText::Text(s)
    }
}

impl From<Vec<u8>> for BridgeText {
    fn from(bytes: Vec<u8>) -> Self {
        BridgeText::Bytes(bytes)
    }
}

impl From<&[u8]> for BridgeText {
    fn from(bytes: &[u8]) -> Self {
        BridgeText::Bytes(bytes.to_vec())
    }
}
