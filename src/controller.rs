//! Room controller
//!
//! The relay state machine. Takes one decoded datagram at a time, mutates
//! the room, and returns the datagrams to send in the order they must go out.
//! It performs no I/O and reads no clock; callers pass `now` in.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::Rejection;
use crate::message::{ClientMessage, ServerMessage};
use crate::participant::Participant;
use crate::reaper::IdleReaper;
use crate::room::Room;
use crate::types::{RoomState, Slot};

/// One datagram to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: SocketAddr,
    pub message: ServerMessage,
}

impl Outbound {
    pub fn new(to: SocketAddr, message: ServerMessage) -> Self {
        Self { to, message }
    }
}

/// Why a participant is leaving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Departure {
    End,
    Timeout,
}

/// Turn-based two-party relay
#[derive(Debug)]
pub struct RoomController {
    room: Room,
    reaper: IdleReaper,
}

impl RoomController {
    /// Create a controller over an empty room
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            room: Room::new(),
            reaper: IdleReaper::new(idle_timeout),
        }
    }

    /// Read-only view of the session state
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Process one inbound datagram
    ///
    /// The sender's activity is recorded first, then idle participants are
    /// reaped, then the command is dispatched.
    pub fn handle_datagram(
        &mut self,
        from: SocketAddr,
        message: ClientMessage,
        now: Instant,
    ) -> Vec<Outbound> {
        self.room.touch(from, now);

        let mut out = self.reap(now);

        match message {
            ClientMessage::Join { name } => self.handle_join(from, name, now, &mut out),
            ClientMessage::End => self.handle_end(from, &mut out),
            ClientMessage::Chat { text } => self.handle_chat(from, text, &mut out),
        }

        out
    }

    /// Evict every participant idle past the threshold
    pub fn reap(&mut self, now: Instant) -> Vec<Outbound> {
        let mut out = Vec::new();

        for addr in self.reaper.stale_participants(&self.room, now) {
            // An earlier eviction may have promoted this participant
            if let Some(slot) = self.room.find_slot(addr) {
                self.depart(slot, Departure::Timeout, &mut out);
            }
        }

        out
    }

    /// Tell every occupant the server is going away and clear the room
    pub fn shutdown(&mut self) -> Vec<Outbound> {
        let out: Vec<Outbound> = self
            .room
            .participants()
            .map(|(_, p)| Outbound::new(p.addr, ServerMessage::ServerShutdown))
            .collect();
        self.room.full_reset();
        out
    }

    /// Handle JOIN
    fn handle_join(
        &mut self,
        from: SocketAddr,
        name: Option<String>,
        now: Instant,
        out: &mut Vec<Outbound>,
    ) {
        // Duplicate JOIN datagrams are answered without touching state
        if let Some(p) = self.room.find_slot(from).and_then(|s| self.room.get(s)) {
            out.push(reject(from, Rejection::AlreadyJoined(p.name.clone())));
            return;
        }

        let Some(slot) = self.room.first_empty() else {
            info!("Rejected {}: room full", from);
            out.push(reject(from, Rejection::RoomFull));
            return;
        };

        let name = name.unwrap_or_else(|| default_name(slot).to_string());
        if self.room.name_in_use(&name) {
            info!("Rejected {}: name '{}' taken", from, name);
            out.push(reject(from, Rejection::NameTaken));
            return;
        }

        let participant = Participant::new(from, name, now);
        info!("{} joined slot {}", participant, slot);
        self.room.place(slot, participant);

        match self.room.state() {
            RoomState::Active => self.start_pairing(out),
            _ => out.push(Outbound::new(from, ServerMessage::JoinedWait)),
        }
    }

    /// Handle chat content
    fn handle_chat(&mut self, from: SocketAddr, text: String, out: &mut Vec<Outbound>) {
        let Some(sender) = self.room.find_slot(from) else {
            debug!("Chat from unregistered {}", from);
            out.push(reject(from, Rejection::NotPaired));
            return;
        };

        if self.room.state() != RoomState::Active {
            out.push(reject(from, Rejection::NotPaired));
            return;
        }

        if sender != self.room.turn() {
            out.push(reject(from, Rejection::NotYourTurn));
            return;
        }

        let (Some(speaker), Some(listener)) =
            (self.room.get(sender), self.room.get(sender.other()))
        else {
            return;
        };

        out.push(Outbound::new(
            listener.addr,
            ServerMessage::Msg {
                from: speaker.name.clone(),
                text,
            },
        ));

        self.room.swap_turn();
        self.push_turn_hints(out);
    }

    /// Handle END
    fn handle_end(&mut self, from: SocketAddr, out: &mut Vec<Outbound>) {
        let Some(slot) = self.room.find_slot(from) else {
            out.push(reject(from, Rejection::NotInChat));
            return;
        };

        self.depart(slot, Departure::End, out);
    }

    /// Remove the participant in `slot`
    ///
    /// The single departure rule shared by END and idle eviction: acknowledge
    /// the leaver, then either hand the room to the survivor in WAITING state
    /// or reset it when nobody is left.
    fn depart(&mut self, slot: Slot, reason: Departure, out: &mut Vec<Outbound>) {
        let Some(leaver) = self.room.vacate(slot) else {
            return;
        };

        match reason {
            Departure::End => info!("{} left", leaver),
            Departure::Timeout => info!("{} timed out", leaver),
        }

        out.push(Outbound::new(leaver.addr, ServerMessage::End));

        if self.room.occupied_count() == 0 {
            self.room.full_reset();
            info!("Room reset");
            return;
        }

        self.room.promote();
        self.room.reset_turn();

        if let Some(survivor) = self.room.get(Slot::First) {
            info!("{} promoted to slot {}; waiting for new peer", survivor, Slot::First);
            out.push(Outbound::new(
                survivor.addr,
                ServerMessage::PeerLeft { name: leaver.name },
            ));
            out.push(Outbound::new(survivor.addr, ServerMessage::JoinedWait));
        }
    }

    /// Fresh pairing: turn goes to slot `First`
    fn start_pairing(&mut self, out: &mut Vec<Outbound>) {
        self.room.reset_turn();

        let (Some(first), Some(second)) = (self.room.get(Slot::First), self.room.get(Slot::Second))
        else {
            return;
        };

        out.push(Outbound::new(
            first.addr,
            ServerMessage::PairedWith {
                name: second.name.clone(),
            },
        ));
        out.push(Outbound::new(
            second.addr,
            ServerMessage::PairedWith {
                name: first.name.clone(),
            },
        ));
        info!("Chat started: {} <-> {}", first, second);

        self.push_turn_hints(out);
    }

    /// YOUR_TURN to the active party, WAIT_FOR to the other
    fn push_turn_hints(&self, out: &mut Vec<Outbound>) {
        let turn = self.room.turn();
        let (Some(active), Some(passive)) = (self.room.get(turn), self.room.get(turn.other()))
        else {
            return;
        };

        out.push(Outbound::new(active.addr, ServerMessage::YourTurn));
        out.push(Outbound::new(
            passive.addr,
            ServerMessage::WaitFor {
                name: active.name.clone(),
            },
        ));
    }
}

/// Name given to a JOIN without one
fn default_name(slot: Slot) -> &'static str {
    match slot {
        Slot::First => "A",
        Slot::Second => "B",
    }
}

fn reject(to: SocketAddr, rejection: Rejection) -> Outbound {
    Outbound::new(to, rejection.into())
}
