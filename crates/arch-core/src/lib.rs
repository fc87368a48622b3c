//! arch-core: seeded multi-floor dungeon layout generator
//!
//! Generates dungeons as a sequence of rectangular floors. Every cell of a
//! floor holds a room, rooms are connected by doors carved by recursive
//! walks, and each floor is entered where the previous one ends.
//!
//! The crate does no rendering and no I/O beyond optionally reading an
//! options file.

pub mod dungeon;
pub mod error;
pub mod geometry;
pub mod options;

mod rng;

pub use dungeon::{Dungeon, Exits, Floor, Room};
pub use error::{GenError, Result};
pub use geometry::{CardinalDirection, CompassDirection, Coord, Extent};
pub use options::{DungeonOptions, GenerationParams, OptionsError, StartDirection};
pub use rng::GameRng;
