//! Idle timeout reaper
//!
//! Finds participants whose last datagram is older than the idle threshold.
//! Eviction itself goes through the controller's departure rule.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::room::Room;

/// Idle-threshold policy
#[derive(Debug, Clone, Copy)]
pub struct IdleReaper {
    idle_timeout: Duration,
}

impl IdleReaper {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }

    /// Addresses of occupants idle for strictly longer than the threshold,
    /// in slot order
    pub fn stale_participants(&self, room: &Room, now: Instant) -> Vec<SocketAddr> {
        room.participants()
            .filter(|(_, p)| p.idle_for(now) > self.idle_timeout)
            .map(|(_, p)| p.addr)
            .collect()
    }
}
