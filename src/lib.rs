//! Two-party turn-based UDP chat relay
//!
//! A rendezvous-and-relay server for exactly two participants exchanging
//! turn-based text messages over UDP. Every datagram carries its source
//! address, which is the only participant identity.
//!
//! # Protocol
//! Plain UTF-8 text, one command per datagram:
//! - `JOIN [name]` takes a free slot (default names `A` / `B`)
//! - `END` leaves the room
//! - anything else is chat, relayed only by the participant holding the turn
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the single owner of the room state
//! - the `handler` receive task decodes datagrams and forwards them to the actor
//! - the `handler` send task writes the actor's replies back to the socket
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::UdpSocket;
//! use turn_relay::{serve, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), turn_relay::AppError> {
//!     let config = RelayConfig::default();
//!     let socket = UdpSocket::bind(&config.bind_addr).await?;
//!     serve(socket, config, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod handler;
pub mod message;
pub mod participant;
pub mod reaper;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use config::RelayConfig;
pub use controller::{Outbound, RoomController};
pub use error::{AppError, Rejection, SendError};
pub use handler::serve;
pub use message::{ClientMessage, ServerMessage};
pub use participant::Participant;
pub use reaper::IdleReaper;
pub use room::Room;
pub use server::{ChatServer, ServerCommand};
pub use types::{RoomState, Slot};
