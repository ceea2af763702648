//! Wire codec
//!
//! Plain UTF-8 text protocol, one command per datagram. Message boundaries
//! come from the transport, so there is no framing or length prefix.

use crate::error::Rejection;

/// Client → Server command
///
/// Decoding is total: anything that is not a JOIN or END is chat content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Request a slot; `None` means the server assigns a positional name
    Join { name: Option<String> },
    /// Leave the room
    End,
    /// Chat payload (trimmed, case preserved)
    Chat { text: String },
}

impl ClientMessage {
    /// Decode a raw datagram
    ///
    /// Only the command keyword is case-insensitive; names and chat text keep
    /// their case. Invalid UTF-8 is replaced rather than rejected.
    pub fn decode(bytes: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(bytes);
        let text = raw.trim();

        if text.eq_ignore_ascii_case("END") {
            return ClientMessage::End;
        }

        if let Some(rest) = strip_join(text) {
            let name = rest.trim();
            return ClientMessage::Join {
                name: (!name.is_empty()).then(|| name.to_string()),
            };
        }

        ClientMessage::Chat {
            text: text.to_string(),
        }
    }
}

/// Returns the remainder after a `JOIN` keyword, which must stand alone or be
/// followed by whitespace (`JOINED` is chat, not a join).
fn strip_join(text: &str) -> Option<&str> {
    let keyword = text.get(..4)?;
    if !keyword.eq_ignore_ascii_case("JOIN") {
        return None;
    }
    let rest = &text[4..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Accepted into slot 0, awaiting a peer
    JoinedWait,
    /// Second participant joined; paired with `name`
    PairedWith { name: String },
    /// Recipient may send the next chat message
    YourTurn,
    /// Recipient must wait for `name`
    WaitFor { name: String },
    /// Relayed chat content
    Msg { from: String, text: String },
    /// Chat rejected; not sender's turn
    NotYourTurn,
    /// Join rejected; name collision
    NameTaken,
    /// Join rejected; room at capacity
    Full,
    /// Informational, no state change
    Info { text: String },
    /// Departure acknowledged to the leaver
    End,
    /// Survivor notice of the peer's departure
    PeerLeft { name: String },
    /// Chat rejected; room not yet paired
    Wait,
    /// Server terminating
    ServerShutdown,
}

impl ServerMessage {
    /// UTF-8 bytes of the wire text
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMessage::JoinedWait => write!(f, "JOINED WAIT"),
            ServerMessage::PairedWith { name } => write!(f, "PAIRED_WITH {}", name),
            ServerMessage::YourTurn => write!(f, "YOUR_TURN"),
            ServerMessage::WaitFor { name } => write!(f, "WAIT_FOR {}", name),
            ServerMessage::Msg { from, text } => write!(f, "MSG {}: {}", from, text),
            ServerMessage::NotYourTurn => write!(f, "NOT_YOUR_TURN"),
            ServerMessage::NameTaken => write!(f, "ERROR NAME_TAKEN"),
            ServerMessage::Full => write!(f, "FULL"),
            ServerMessage::Info { text } => write!(f, "INFO {}", text),
            ServerMessage::End => write!(f, "END"),
            ServerMessage::PeerLeft { name } => write!(f, "PEER_LEFT {}", name),
            ServerMessage::Wait => write!(f, "WAIT"),
            ServerMessage::ServerShutdown => write!(f, "SERVER_SHUTDOWN"),
        }
    }
}

/// Convert a protocol rejection into the reply sent to the offending sender
impl From<Rejection> for ServerMessage {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::NameTaken => ServerMessage::NameTaken,
            Rejection::RoomFull => ServerMessage::Full,
            Rejection::NotYourTurn => ServerMessage::NotYourTurn,
            Rejection::NotPaired => ServerMessage::Wait,
            Rejection::AlreadyJoined(name) => ServerMessage::Info {
                text: format!("already joined as {}", name),
            },
            Rejection::NotInChat => ServerMessage::Info {
                text: "not in chat".to_string(),
            },
        }
    }
}
