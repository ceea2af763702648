//! Relay configuration
//!
//! Loaded from an optional JSON file; every field falls back to a default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// Default bind address
pub const DEFAULT_ADDR: &str = "0.0.0.0:6666";

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// UDP listen address
    pub bind_addr: String,
    /// Idle time after which a participant is evicted
    pub idle_timeout_ms: u64,
    /// Period of the background reap tick
    pub reap_interval_ms: u64,
    /// Receive buffer size; longer datagrams are truncated
    pub max_datagram_size: usize,
    /// Capacity of the command and outbound channels
    pub channel_buffer_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            idle_timeout_ms: 600_000,
            reap_interval_ms: 5_000,
            max_datagram_size: 2048,
            channel_buffer_size: 256,
        }
    }
}

impl RelayConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Reap tick period (never zero)
    pub fn reap_interval(&self) -> Duration {
        Duration::from_millis(self.reap_interval_ms.max(1))
    }

    /// Channel capacity (never zero)
    pub fn channel_capacity(&self) -> usize {
        self.channel_buffer_size.max(1)
    }
}
