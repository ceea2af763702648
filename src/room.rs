//! Room struct definition
//!
//! Session state of the single two-slot chat room. Holds data and
//! mutators only; every policy decision is made by the controller.

use std::net::SocketAddr;
use std::time::Instant;

use crate::participant::Participant;
use crate::types::{RoomState, Slot};

/// 1:1 Chat Room
///
/// At most 2 participants: slot `First` and slot `Second`.
/// `turn` is only meaningful while both slots are occupied.
#[derive(Debug)]
pub struct Room {
    slots: [Option<Participant>; 2],
    turn: Slot,
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}

impl Room {
    /// Create an empty room
    pub fn new() -> Self {
        Self {
            slots: [None, None],
            turn: Slot::First,
        }
    }

    /// Find the slot held by `addr`
    pub fn find_slot(&self, addr: SocketAddr) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.get(*slot).is_some_and(|p| p.is(addr)))
    }

    /// Get the number of occupied slots
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Current state derived from occupancy
    pub fn state(&self) -> RoomState {
        RoomState::from_occupancy(self.occupied_count())
    }

    /// Check if any occupant already uses `name` (case-insensitive)
    pub fn name_in_use(&self, name: &str) -> bool {
        self.participants().any(|(_, p)| p.has_name(name))
    }

    /// First free slot in allocation order
    pub fn first_empty(&self) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| self.get(*slot).is_none())
    }

    /// Participant in `slot`, if any
    pub fn get(&self, slot: Slot) -> Option<&Participant> {
        self.slots[slot.index()].as_ref()
    }

    /// Occupied slots in order
    pub fn participants(&self) -> impl Iterator<Item = (Slot, &Participant)> {
        Slot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|p| (slot, p)))
    }

    /// Slot currently holding the turn
    pub fn turn(&self) -> Slot {
        self.turn
    }

    /// Put a participant into a slot, replacing any occupant
    pub fn place(&mut self, slot: Slot, participant: Participant) {
        self.slots[slot.index()] = Some(participant);
    }

    /// Clear a slot, returning its former occupant
    pub fn vacate(&mut self, slot: Slot) -> Option<Participant> {
        self.slots[slot.index()].take()
    }

    /// Move a lone `Second` occupant into `First`
    ///
    /// Mirrors a host leaving: the remaining party becomes slot 0.
    pub fn promote(&mut self) {
        if self.slots[0].is_none() {
            self.slots[0] = self.slots[1].take();
        }
    }

    /// Update the activity timestamp of the participant at `addr`
    ///
    /// Returns false when `addr` is not a participant.
    pub fn touch(&mut self, addr: SocketAddr, now: Instant) -> bool {
        match self.slots.iter_mut().flatten().find(|p| p.is(addr)) {
            Some(p) => {
                p.touch(now);
                true
            }
            None => false,
        }
    }

    /// Hand the turn to the other slot
    pub fn swap_turn(&mut self) {
        self.turn = self.turn.other();
    }

    /// Give the turn back to slot `First`
    pub fn reset_turn(&mut self) {
        self.turn = Slot::First;
    }

    /// Remove everyone and reset the turn
    pub fn full_reset(&mut self) {
        self.slots = [None, None];
        self.turn = Slot::First;
    }
}
