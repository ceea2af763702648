//! Error types for the relay
//!
//! Defines application-level errors and outbound queue errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Fatal errors: startup, socket and task failures. These are reported to
/// the operator and never sent to a participant.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal when raised by the socket or config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A relay task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Protocol rejections
///
/// Replied to the offending sender as a normal message, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Requested display name is held by the other participant
    #[error("Name taken")]
    NameTaken,

    /// Room already has 2 participants
    #[error("Room is full")]
    RoomFull,

    /// Chat sent by the participant who is not holding the turn
    #[error("Not your turn")]
    NotYourTurn,

    /// Chat sent before the room is paired
    #[error("Room not paired")]
    NotPaired,

    /// Sender is already registered under the given name
    #[error("Already joined as {0}")]
    AlreadyJoined(String),

    /// END from an address that is not a participant
    #[error("Not in chat")]
    NotInChat,
}

/// Message send errors
///
/// Occurs when the outbound queue to the socket writer has been closed.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
