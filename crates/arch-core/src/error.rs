//! Generator errors
//!
//! Every variant is a broken contract between generator components, not an
//! expected runtime outcome. A walk that cannot extend is reported as `false`,
//! never as an error.

use thiserror::Error;

use crate::geometry::{CompassDirection, Coord, Extent};
use crate::options::OptionsError;

/// Errors raised while generating a dungeon
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    #[error("rooms {from} and {to} are not grid adjacent")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("join from {from} to {to} faces {facing}, expected north or east")]
    NonCanonicalJoin {
        from: Coord,
        to: Coord,
        facing: CompassDirection,
    },

    #[error("margin {margin} leaves no interior in extent {extent}")]
    MarginTooLarge { extent: Extent, margin: u32 },

    #[error("unrecognized direction index {0}")]
    UnrecognizedDirection(u8),

    #[error("coordinate {coord} is outside floor extent {extent}")]
    OutOfBounds { coord: Coord, extent: Extent },

    #[error("no room has been carved at {0}")]
    NotCarved(Coord),

    #[error("room grid does not match floor extent {0}")]
    MalformedGrid(Extent),

    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),
}

/// Result alias used throughout the generator
pub type Result<T> = core::result::Result<T, GenError>;
