//! Participant record
//!
//! Identity unit of one connected party.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// One registered chat participant
///
/// The source address is the only identity a datagram carries. A NAT that
/// reuses the same public host and port for a different party will be
/// attributed to this participant; nothing at this layer can tell them apart.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Remote host and port
    pub addr: SocketAddr,
    /// Display name, unique (case-insensitively) within the room
    pub name: String,
    /// Time of the last datagram received from `addr`
    pub last_activity: Instant,
}

impl Participant {
    /// Create a participant first seen at `now`
    pub fn new(addr: SocketAddr, name: String, now: Instant) -> Self {
        Self {
            addr,
            name,
            last_activity: now,
        }
    }

    /// Check whether a datagram from `addr` belongs to this participant
    pub fn is(&self, addr: SocketAddr) -> bool {
        self.addr == addr
    }

    /// Record activity
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// Time since the last activity (zero if `now` is earlier)
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_identity_is_host_and_port() {
        let p = Participant::new(addr(5000), "Alice".to_string(), Instant::now());
        assert!(p.is(addr(5000)));
        assert!(!p.is(addr(5001)));
        assert!(!p.is(SocketAddr::from(([127, 0, 0, 2], 5000))));
    }

    #[test]
    fn test_touch_and_idle() {
        let start = Instant::now();
        let mut p = Participant::new(addr(5000), "Alice".to_string(), start);
        let later = start + Duration::from_secs(30);
        assert_eq!(p.idle_for(later), Duration::from_secs(30));

        p.touch(later);
        assert_eq!(p.idle_for(later), Duration::ZERO);
        // Clock readings from before the touch never underflow
        assert_eq!(p.idle_for(start), Duration::ZERO);
    }

    #[test]
    fn test_has_name_ignores_case() {
        let p = Participant::new(addr(5000), "Ärger".to_string(), Instant::now());
        assert!(p.has_name("ärger"));
        assert!(p.has_name("ÄRGER"));
        assert!(!p.has_name("Arger"));
    }
}
