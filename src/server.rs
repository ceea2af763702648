//! ChatServer Actor implementation
//!
//! The single owner of the room. Receives decoded datagrams over an mpsc
//! channel, runs the idle reaper on a fixed tick, and forwards every reply
//! to the socket writer in the order the controller produced it.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::controller::{Outbound, RoomController};
use crate::error::SendError;
use crate::message::ClientMessage;

/// Commands sent from the transport to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// A decoded datagram
    Datagram {
        from: SocketAddr,
        message: ClientMessage,
    },
    /// Notify participants and stop
    Shutdown,
}

/// The main ChatServer actor
pub struct ChatServer {
    controller: RoomController,
    reap_interval: Duration,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
    /// Server → socket writer channel
    outbound: mpsc::Sender<Outbound>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command and outbound channels
    pub fn new(
        config: &RelayConfig,
        receiver: mpsc::Receiver<ServerCommand>,
        outbound: mpsc::Sender<Outbound>,
    ) -> Self {
        Self {
            controller: RoomController::new(config.idle_timeout()),
            reap_interval: config.reap_interval(),
            receiver,
            outbound,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Ends on `Shutdown`, when all command senders are dropped, or when the
    /// socket writer is gone. Occupied slots get `SERVER_SHUTDOWN` on the way
    /// out; dropping `self` then closes the outbound channel.
    pub async fn run(mut self) {
        info!("ChatServer started");

        let mut ticker = time::interval(self.reap_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let batch = tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(ServerCommand::Datagram { from, message }) => {
                        debug!("[RX] {} -> {:?}", from, message);
                        self.controller.handle_datagram(from, message, Instant::now())
                    }
                    Some(ServerCommand::Shutdown) | None => break,
                },
                _ = ticker.tick() => self.controller.reap(Instant::now()),
            };

            if let Err(e) = self.dispatch(batch).await {
                warn!("Outbound queue unavailable: {}", e);
                break;
            }
        }

        let farewell = self.controller.shutdown();
        if let Err(e) = self.dispatch(farewell).await {
            warn!("Could not queue shutdown notices: {}", e);
        }

        info!("ChatServer shutting down");
    }

    /// Queue replies for the socket writer, preserving order
    async fn dispatch(&self, batch: Vec<Outbound>) -> Result<(), SendError> {
        for out in batch {
            self.outbound
                .send(out)
                .await
                .map_err(|_| SendError::ChannelClosed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ServerMessage;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn join(name: &str) -> ServerCommand {
        ServerCommand::Datagram {
            from: addr(1),
            message: ClientMessage::Join {
                name: Some(name.to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_replies_forwarded_in_order() {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (out_tx, mut out_rx) = mpsc::channel(32);
        let handle = tokio::spawn(ChatServer::new(&RelayConfig::default(), cmd_rx, out_tx).run());

        cmd_tx.send(join("Alice")).await.unwrap();
        let out = out_rx.recv().await.unwrap();
        assert_eq!(out, Outbound::new(addr(1), ServerMessage::JoinedWait));

        cmd_tx.send(ServerCommand::Shutdown).await.unwrap();
        let out = out_rx.recv().await.unwrap();
        assert_eq!(out, Outbound::new(addr(1), ServerMessage::ServerShutdown));

        handle.await.unwrap();
        // Actor dropped its sender
        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_closing_command_channel_notifies_participants() {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (out_tx, mut out_rx) = mpsc::channel(32);
        let handle = tokio::spawn(ChatServer::new(&RelayConfig::default(), cmd_rx, out_tx).run());

        cmd_tx.send(join("Alice")).await.unwrap();
        drop(cmd_tx);
        handle.await.unwrap();

        assert_eq!(out_rx.recv().await.unwrap().message, ServerMessage::JoinedWait);
        assert_eq!(
            out_rx.recv().await.unwrap().message,
            ServerMessage::ServerShutdown
        );
    }

    #[tokio::test]
    async fn test_tick_reaps_idle_participant() {
        let config = RelayConfig {
            idle_timeout_ms: 20,
            reap_interval_ms: 10,
            ..RelayConfig::default()
        };
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (out_tx, mut out_rx) = mpsc::channel(32);
        let handle = tokio::spawn(ChatServer::new(&config, cmd_rx, out_tx).run());

        cmd_tx.send(join("Alice")).await.unwrap();
        assert_eq!(out_rx.recv().await.unwrap().message, ServerMessage::JoinedWait);

        // No further traffic; the tick alone must evict Alice
        let evicted = time::timeout(Duration::from_secs(2), out_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(evicted, Outbound::new(addr(1), ServerMessage::End));

        cmd_tx.send(ServerCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
        // Room already empty: no shutdown notice
        assert!(out_rx.recv().await.is_none());
    }
}
