//! UDP transport handler
//!
//! Owns the socket: a receive task that decodes datagrams and feeds the
//! ChatServer actor, and a send task that writes the actor's replies.
//! `serve` wires the three tasks together and runs the shutdown sequence.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::config::RelayConfig;
use crate::controller::Outbound;
use crate::error::AppError;
use crate::message::ClientMessage;
use crate::server::{ChatServer, ServerCommand};

/// Run the relay on a bound socket until `shutdown` resolves or the socket
/// fails
///
/// Either way, occupied slots are sent `SERVER_SHUTDOWN` and queued replies
/// are flushed before this returns. A fatal socket error is returned to the
/// caller after that.
pub async fn serve<F>(socket: UdpSocket, config: RelayConfig, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()>,
{
    let socket = Arc::new(socket);
    if let Ok(local) = socket.local_addr() {
        info!("Relay listening on {}", local);
    }

    let max_datagram_size = config.max_datagram_size;
    supervise(Arc::clone(&socket), config, shutdown, move |cmd_tx| {
        receive_loop(socket, cmd_tx, max_datagram_size)
    })
    .await
}

/// Spawn the actor, the writer and the receive task built by `reader`, then
/// run the shutdown sequence once `shutdown` resolves or the reader ends
async fn supervise<F, R, Fut>(
    socket: Arc<UdpSocket>,
    config: RelayConfig,
    shutdown: F,
    reader: R,
) -> Result<(), AppError>
where
    F: Future<Output = ()>,
    R: FnOnce(mpsc::Sender<ServerCommand>) -> Fut,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(config.channel_capacity());
    let (out_tx, out_rx) = mpsc::channel(config.channel_capacity());

    let server_task = tokio::spawn(ChatServer::new(&config, cmd_rx, out_tx).run());
    let write_task = tokio::spawn(send_loop(socket, out_rx));
    let mut read_task = tokio::spawn(reader(cmd_tx.clone()));

    let result = tokio::select! {
        _ = shutdown => {
            info!("Shutdown requested");
            Ok(())
        }
        joined = &mut read_task => match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("Socket failure: {}", e);
                Err(e)
            }
            Err(e) => Err(AppError::Task(e)),
        },
    };

    read_task.abort();

    if cmd_tx.send(ServerCommand::Shutdown).await.is_err() {
        debug!("ChatServer already stopped");
    }
    drop(cmd_tx);

    let server_joined = server_task.await;
    // The actor dropped its outbound sender, so the writer drains and ends
    let write_joined = write_task.await;

    info!("Shutdown complete");
    settle(result, [server_joined, write_joined])
}

/// Combine the serve outcome with the shutdown outcome of the other tasks
///
/// A socket failure stays the reported error; task failures seen while
/// shutting down are logged and only returned when nothing failed before.
fn settle(
    result: Result<(), AppError>,
    tasks: [Result<(), JoinError>; 2],
) -> Result<(), AppError> {
    let mut result = result;
    for joined in tasks {
        if let Err(e) = joined {
            error!("Relay task failed: {}", e);
            if result.is_ok() {
                result = Err(AppError::Task(e));
            }
        }
    }
    result
}

/// Receive datagrams and forward them to the actor
///
/// Transient errors are logged and skipped; any other socket error ends the
/// loop with `Err`. Returns `Ok` once the actor stops accepting commands.
pub async fn receive_loop(
    socket: Arc<UdpSocket>,
    cmd_tx: mpsc::Sender<ServerCommand>,
    max_datagram_size: usize,
) -> Result<(), AppError> {
    let mut buf = vec![0u8; max_datagram_size.max(1)];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => {
                let message = ClientMessage::decode(&buf[..len]);
                if cmd_tx
                    .send(ServerCommand::Datagram { from, message })
                    .await
                    .is_err()
                {
                    debug!("ChatServer closed, ending receive loop");
                    return Ok(());
                }
            }
            Err(e) if is_transient_io_error(&e) => {
                warn!("Receive failed, continuing: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write queued replies to the socket until the actor hangs up
///
/// Sends are fire-and-forget: a failure is logged and the next reply goes out.
pub async fn send_loop(socket: Arc<UdpSocket>, mut out_rx: mpsc::Receiver<Outbound>) {
    while let Some(out) = out_rx.recv().await {
        match socket.send_to(&out.message.encode(), out.to).await {
            Ok(_) => debug!("[TX] {} -> {}", out.message, out.to),
            Err(e) => warn!("Send to {} failed: {}", out.to, e),
        }
    }
    debug!("Send loop ended");
}

/// Returns true if the error concerns a single datagram rather than the socket
///
/// ICMP port-unreachable from a departed client surfaces as `ConnectionReset`
/// or `ConnectionRefused` on some platforms.
fn is_transient_io_error(e: &io::Error) -> bool {
    use io::ErrorKind;
    matches!(
        e.kind(),
        ErrorKind::TimedOut
            | ErrorKind::WouldBlock
            | ErrorKind::Interrupted
            | ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
    )
}
