//! Grid geometry: coordinates, extents and directions
//!
//! The grid origin `(0,0)` is the north-west corner. `x` grows eastward and
//! `y` grows southward, so North is `y - 1`.

use core::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::{GenError, Result};
use crate::rng::GameRng;

/// A grid cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if this is the `(0,0)` corner
    pub const fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Distance to another coordinate
    ///
    /// Axis-aligned pairs use the exact absolute difference; anything else is
    /// Euclidean.
    pub fn distance(&self, other: Coord) -> f64 {
        if self.x == other.x {
            return f64::from((self.y - other.y).abs());
        }
        if self.y == other.y {
            return f64::from((self.x - other.x).abs());
        }
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Check if `other` shares an edge with this cell (distance exactly 1)
    pub const fn is_adjacent(&self, other: Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx == 1 && dy == 0) || (dx == 0 && dy == 1)
    }

    /// The neighbouring cell one step in a cardinal direction
    pub const fn moved(&self, dir: CardinalDirection) -> Coord {
        let (dx, dy) = dir.delta();
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Classify where `other` lies relative to this coordinate
    ///
    /// Shared rows or columns resolve to a cardinal bearing; only when both
    /// axes differ is a diagonal returned.
    pub fn bearing_to(&self, other: Coord) -> CompassDirection {
        use CompassDirection::*;

        if self.x == other.x {
            match self.y.cmp(&other.y) {
                core::cmp::Ordering::Less => South,
                core::cmp::Ordering::Greater => North,
                core::cmp::Ordering::Equal => Center,
            }
        } else if self.y == other.y {
            if self.x < other.x { East } else { West }
        } else if self.x < other.x {
            if self.y < other.y { SouthEast } else { NorthEast }
        } else if self.y < other.y {
            SouthWest
        } else {
            NorthWest
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Grid or room dimensions
///
/// `(0,0)` is the "unset" sentinel used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const ZERO: Extent = Extent { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check for the unset sentinel
    pub const fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Number of cells covered, widened so any pair of `i32` axes fits
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if a coordinate falls inside `[0, width) x [0, height)`
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Uniformly random coordinate inside the extent, `margin` cells away
    /// from every edge
    ///
    /// Fails when the margin would consume the whole width or height.
    pub fn random_interior(&self, rng: &mut GameRng, margin: u32) -> Result<Coord> {
        let m = i32::try_from(margin).unwrap_or(i32::MAX);
        if m >= (self.width + 1) / 2 || m >= (self.height + 1) / 2 {
            return Err(GenError::MarginTooLarge {
                extent: *self,
                margin,
            });
        }
        Ok(Coord::new(
            rng.range(m, self.width - m),
            rng.range(m, self.height - m),
        ))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One of the four directions a carving walk can step in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CardinalDirection {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    /// `(dx, dy)` for one step
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, -1),
            CardinalDirection::South => (0, 1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }

    /// Rotate by `turns` quarter turns
    pub fn rotate(self, clockwise: bool, turns: u32) -> Self {
        use CardinalDirection::*;

        let mut dir = self;
        for _ in 0..turns % 4 {
            dir = match (dir, clockwise) {
                (North, true) | (South, false) => East,
                (East, true) | (West, false) => South,
                (South, true) | (North, false) => West,
                (West, true) | (East, false) => North,
            };
        }
        dir
    }

    /// Uniform draw over all four directions
    pub fn random(rng: &mut GameRng) -> Result<Self> {
        Self::try_from(rng.rn2(4) as u8)
    }
}

impl TryFrom<u8> for CardinalDirection {
    type Error = GenError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CardinalDirection::North),
            1 => Ok(CardinalDirection::South),
            2 => Ok(CardinalDirection::East),
            3 => Ok(CardinalDirection::West),
            other => Err(GenError::UnrecognizedDirection(other)),
        }
    }
}

/// Eight-point compass bearing, plus `Center` for "same cell"
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CompassDirection {
    Center = 0,
    North = 1,
    NorthEast = 2,
    East = 3,
    SouthEast = 4,
    South = 5,
    SouthWest = 6,
    West = 7,
    NorthWest = 8,
}

impl CompassDirection {
    /// Rotate by `turns` eighth turns
    ///
    /// `Center` has no heading; rotating it is a caller mistake that is
    /// logged and ignored.
    pub fn rotate(self, clockwise: bool, turns: u32) -> Self {
        if self == CompassDirection::Center {
            tracing::warn!("request to rotate the Center direction ignored");
            return self;
        }

        // Headings 1..=8 run clockwise from North.
        let idx = (self as u8 - 1) as u32;
        let step = turns % 8;
        let next = if clockwise {
            (idx + step) % 8
        } else {
            (idx + 8 - step) % 8
        };
        // `next` is always in 0..8, so the conversion cannot fail.
        Self::try_from(next as u8 + 1).unwrap_or(self)
    }

    /// Check if `other` is this direction or one of its two components
    /// (for diagonals) or one of the diagonals sharing it (for cardinals)
    pub fn contains(&self, other: CompassDirection) -> bool {
        use CompassDirection::*;

        if *self == other {
            return true;
        }
        match self {
            Center => false,
            West => matches!(other, NorthWest | SouthWest),
            East => matches!(other, NorthEast | SouthEast),
            North => matches!(other, NorthEast | NorthWest),
            South => matches!(other, SouthEast | SouthWest),
            SouthEast => matches!(other, South | East),
            NorthEast => matches!(other, North | East),
            SouthWest => matches!(other, South | West),
            NorthWest => matches!(other, North | West),
        }
    }

    /// `(dx, dy)` for one step, diagonals included
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            CompassDirection::Center => (0, 0),
            CompassDirection::North => (0, -1),
            CompassDirection::NorthEast => (1, -1),
            CompassDirection::East => (1, 0),
            CompassDirection::SouthEast => (1, 1),
            CompassDirection::South => (0, 1),
            CompassDirection::SouthWest => (-1, 1),
            CompassDirection::West => (-1, 0),
            CompassDirection::NorthWest => (-1, -1),
        }
    }

    /// Move one cell in this direction
    pub const fn step(&self, coord: Coord) -> Coord {
        let (dx, dy) = self.delta();
        Coord::new(coord.x + dx, coord.y + dy)
    }

    pub const fn is_cardinal(&self) -> bool {
        matches!(
            self,
            CompassDirection::North
                | CompassDirection::South
                | CompassDirection::East
                | CompassDirection::West
        )
    }

    pub const fn to_cardinal(&self) -> Option<CardinalDirection> {
        match self {
            CompassDirection::North => Some(CardinalDirection::North),
            CompassDirection::South => Some(CardinalDirection::South),
            CompassDirection::East => Some(CardinalDirection::East),
            CompassDirection::West => Some(CardinalDirection::West),
            _ => None,
        }
    }
}

impl From<CardinalDirection> for CompassDirection {
    fn from(dir: CardinalDirection) -> Self {
        match dir {
            CardinalDirection::North => CompassDirection::North,
            CardinalDirection::South => CompassDirection::South,
            CardinalDirection::East => CompassDirection::East,
            CardinalDirection::West => CompassDirection::West,
        }
    }
}

impl TryFrom<u8> for CompassDirection {
    type Error = GenError;

    fn try_from(value: u8) -> Result<Self> {
        use CompassDirection::*;

        Ok(match value {
            0 => Center,
            1 => North,
            2 => NorthEast,
            3 => East,
            4 => SouthEast,
            5 => South,
            6 => SouthWest,
            7 => West,
            8 => NorthWest,
            other => return Err(GenError::UnrecognizedDirection(other)),
        })
    }
}
