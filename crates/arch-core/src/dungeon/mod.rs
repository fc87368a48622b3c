//! Dungeon layout
//!
//! Room and floor data model, the carving walk, the per-floor builder and the
//! multi-floor orchestrator.

mod builder;
mod carve;
mod floor;
mod generator;
mod room;

pub use builder::{build_floor, pick_end, END_CANDIDATES};
pub use carve::carve;
pub use floor::Floor;
pub use generator::Dungeon;
pub use room::{Exits, Room, END_WALK, START_WALK};
