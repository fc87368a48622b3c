//! A single carved grid cell

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Walk id of the walk launched from a floor's start cell
pub const START_WALK: u32 = 1;
/// Walk id of the walk launched from a floor's end cell
pub const END_WALK: u32 = 2;

/// A carved room
///
/// Only north and east doors are stored. The south door of a room is the
/// `exit_north` of the room below it, and the west door is the `exit_east` of
/// the room to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Walk that carved this room (never 0)
    pub origin: u32,
    /// Steps from that walk's root, starting at 1
    pub depth: u32,
    pub exit_north: bool,
    pub exit_east: bool,
    /// The carving walk could not extend or merge from here
    pub terminal: bool,
}

impl Room {
    pub const fn new(origin: u32, depth: u32) -> Self {
        Self {
            origin,
            depth,
            exit_north: false,
            exit_east: false,
            terminal: false,
        }
    }

    /// Root of the first walk, i.e. the floor's entrance
    pub const fn is_start(&self) -> bool {
        self.origin == START_WALK && self.depth == 1
    }

    /// Root of the walk seeded on the floor's end cell
    pub const fn is_end_seed(&self) -> bool {
        self.origin == END_WALK && self.depth == 1
    }
}

bitflags! {
    /// Every door of a room, including the ones stored on its neighbours
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Exits: u8 {
        const NORTH = 0x01;
        const EAST = 0x02;
        const SOUTH = 0x04;
        const WEST = 0x08;
    }
}

// Manual serde impl for Exits
impl Serialize for Exits {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Exits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Exits::from_bits_truncate(bits))
    }
}
