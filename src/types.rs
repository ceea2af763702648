//! Basic type definitions for the relay
//!
//! - `Slot`: one of the two participant positions in the room
//! - `RoomState`: occupancy-derived state of the room

/// Participant position in the room
///
/// Slot `First` is the party that waits for a partner and speaks first
/// once paired. The same enum doubles as the turn indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Both slots in allocation order
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    /// Array index of this slot
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// The opposite slot
    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::First => write!(f, "FIRST"),
            Slot::Second => write!(f, "SECOND"),
        }
    }
}

/// Room state, derived purely from slot occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// No participants
    Empty,
    /// One participant waiting for a partner
    Waiting,
    /// Two participants exchanging turns
    Active,
}

impl RoomState {
    /// Map an occupied-slot count to a state
    pub fn from_occupancy(count: usize) -> Self {
        match count {
            0 => RoomState::Empty,
            1 => RoomState::Waiting,
            _ => RoomState::Active,
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomState::Empty => write!(f, "EMPTY"),
            RoomState::Waiting => write!(f, "WAITING"),
            RoomState::Active => write!(f, "ACTIVE"),
        }
    }
}
