//! Turn-based UDP chat relay - Entry Point
//!
//! Loads configuration, binds the UDP socket and runs the relay until Ctrl-C.

use std::env;
use std::path::PathBuf;

use tokio::net::UdpSocket;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use turn_relay::{serve, RelayConfig};

/// Environment variable naming an optional JSON config file
const CONFIG_ENV: &str = "RELAY_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=turn_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("turn_relay=info")),
        )
        .init();

    let mut config = match env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Loading config from {}", path.display());
            RelayConfig::load(&path).inspect_err(|e| error!("Invalid config: {}", e))?
        }
        None => RelayConfig::default(),
    };

    // Bind address from command line overrides the config
    if let Some(addr) = env::args().nth(1) {
        config.bind_addr = addr;
    }

    let socket = UdpSocket::bind(&config.bind_addr)
        .await
        .inspect_err(|e| error!("Unable to bind {}: {}", config.bind_addr, e))?;

    serve(socket, config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    Ok(())
}
