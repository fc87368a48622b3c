//! Generation options and configuration
//!
//! `DungeonOptions` holds what the caller asked for; unset fields resolve to
//! the defaults below when turned into `GenerationParams`. Options can also be
//! read from a small rc-style text file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::geometry::Extent;

/// Tile dimensions of a single room
pub const DEFAULT_ROOM_SIZE: Extent = Extent::new(12, 9);
/// Fewest floors a dungeon may have
pub const DEFAULT_MIN_DEPTH: u32 = 1;
/// Most floors a dungeon may have
pub const DEFAULT_MAX_DEPTH: u32 = 10;
/// Smallest rooms-per-floor grid
pub const DEFAULT_MIN_ROOMS_PER_FLOOR: Extent = Extent::new(2, 2);
/// Largest rooms-per-floor grid
pub const DEFAULT_MAX_ROOMS_PER_FLOOR: Extent = Extent::new(5, 5);

/// Upper bound on `max_depth`
pub const DEPTH_LIMIT: u32 = 1024;
/// Upper bound on either axis of the rooms-per-floor grid
pub const ROOMS_PER_AXIS_LIMIT: i32 = 256;

/// Where on the first floor the dungeon is entered
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum StartDirection {
    West,
    East,
    South,
    North,
    /// Dropped in from above, anywhere on the grid
    Up,
    #[default]
    DontCare,
}

impl StartDirection {
    /// Edges a `DontCare` preference resolves to, in draw order
    pub const CONCRETE: [StartDirection; 5] = [
        StartDirection::West,
        StartDirection::East,
        StartDirection::South,
        StartDirection::North,
        StartDirection::Up,
    ];
}

/// Caller-facing generation options; `None` means "use the default"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonOptions {
    /// `None` draws a fresh seed
    pub seed: Option<u64>,
    pub room_size: Option<Extent>,
    pub min_depth: Option<u32>,
    pub max_depth: Option<u32>,
    pub min_rooms_per_floor: Option<Extent>,
    pub max_rooms_per_floor: Option<Extent>,
    pub start_direction: Option<StartDirection>,
    /// Every cell occupied. Only `true` is implemented.
    pub packed: Option<bool>,
}

/// Fully resolved generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub room_size: Extent,
    pub min_depth: u32,
    pub max_depth: u32,
    pub min_rooms_per_floor: Extent,
    pub max_rooms_per_floor: Extent,
    pub start_direction: StartDirection,
    pub packed: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            room_size: DEFAULT_ROOM_SIZE,
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            min_rooms_per_floor: DEFAULT_MIN_ROOMS_PER_FLOOR,
            max_rooms_per_floor: DEFAULT_MAX_ROOMS_PER_FLOOR,
            start_direction: StartDirection::DontCare,
            packed: true,
        }
    }
}

impl GenerationParams {
    /// Check ranges and extents
    pub fn validate(&self) -> Result<(), OptionsError> {
        for (name, extent) in [
            ("room_size", self.room_size),
            ("min_rooms", self.min_rooms_per_floor),
            ("max_rooms", self.max_rooms_per_floor),
        ] {
            if extent.width <= 0 || extent.height <= 0 {
                return Err(OptionsError::NonPositiveExtent(name.to_string(), extent));
            }
        }
        if self.min_depth == 0 {
            return Err(OptionsError::InvalidValue(
                "min_depth".to_string(),
                "0".to_string(),
            ));
        }
        if self.min_depth > self.max_depth {
            return Err(OptionsError::InvertedRange(
                "depth".to_string(),
                format!("{}..{}", self.min_depth, self.max_depth),
            ));
        }
        if self.max_depth > DEPTH_LIMIT {
            return Err(OptionsError::ExceedsLimit(
                "max_depth".to_string(),
                self.max_depth.to_string(),
                DEPTH_LIMIT.to_string(),
            ));
        }
        let (lo, hi) = (self.min_rooms_per_floor, self.max_rooms_per_floor);
        if lo.width > hi.width || lo.height > hi.height {
            return Err(OptionsError::InvertedRange(
                "rooms_per_floor".to_string(),
                format!("{}..{}", lo, hi),
            ));
        }
        if hi.width > ROOMS_PER_AXIS_LIMIT || hi.height > ROOMS_PER_AXIS_LIMIT {
            return Err(OptionsError::ExceedsLimit(
                "max_rooms".to_string(),
                hi.to_string(),
                format!("{0}x{0}", ROOMS_PER_AXIS_LIMIT),
            ));
        }
        if !self.packed {
            return Err(OptionsError::UnpackedUnsupported);
        }
        Ok(())
    }
}

impl DungeonOptions {
    /// Apply defaults to unset fields and validate the result
    ///
    /// Zero extents and zero depths count as unset.
    pub fn resolve(&self) -> Result<GenerationParams, OptionsError> {
        let extent_or = |value: Option<Extent>, default: Extent| {
            value.filter(|e| !e.is_empty()).unwrap_or(default)
        };
        let depth_or = |value: Option<u32>, default: u32| value.filter(|d| *d != 0).unwrap_or(default);

        let params = GenerationParams {
            room_size: extent_or(self.room_size, DEFAULT_ROOM_SIZE),
            min_depth: depth_or(self.min_depth, DEFAULT_MIN_DEPTH),
            max_depth: depth_or(self.max_depth, DEFAULT_MAX_DEPTH),
            min_rooms_per_floor: extent_or(self.min_rooms_per_floor, DEFAULT_MIN_ROOMS_PER_FLOOR),
            max_rooms_per_floor: extent_or(self.max_rooms_per_floor, DEFAULT_MAX_ROOMS_PER_FLOOR),
            start_direction: self.start_direction.unwrap_or_default(),
            packed: self.packed.unwrap_or(true),
        };
        params.validate()?;
        Ok(params)
    }

    /// Load options from a file
    pub fn load_from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| OptionsError::Io(e.to_string()))?;

        Self::parse_config(&contents)
    }

    /// Parse options from a config string
    ///
    /// Lines look like `OPTIONS=seed:42,max_depth:3,start:north,!packed`.
    pub fn parse_config(contents: &str) -> Result<Self, OptionsError> {
        let mut options = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    let opt = opt.trim();
                    if !opt.is_empty() {
                        options.parse_option(opt)?;
                    }
                }
            } else {
                return Err(OptionsError::UnknownOption(line.to_string()));
            }
        }

        Ok(options)
    }

    /// Parse a single option
    fn parse_option(&mut self, opt: &str) -> Result<(), OptionsError> {
        // Handle key=value options
        if let Some((key, value)) = opt.split_once(':') {
            return self.set_option(key.trim(), value.trim());
        }
        if let Some((key, value)) = opt.split_once('=') {
            return self.set_option(key.trim(), value.trim());
        }

        // Handle negation
        let (negated, name) = if let Some(name) = opt.strip_prefix('!') {
            (true, name)
        } else if let Some(name) = opt.strip_prefix("no") {
            (true, name)
        } else {
            (false, opt)
        };

        match name {
            "packed" => self.packed = Some(!negated),
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Set an option with a value
    fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionsError> {
        if value.is_empty() {
            return Err(OptionsError::MissingValue(name.to_string()));
        }
        let invalid = || OptionsError::InvalidValue(name.to_string(), value.to_string());

        match name {
            "seed" => {
                self.seed = if value == "random" {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                };
            }
            "room_size" => self.room_size = Some(parse_extent(value).ok_or_else(invalid)?),
            "min_depth" => self.min_depth = Some(value.parse().map_err(|_| invalid())?),
            "max_depth" => self.max_depth = Some(value.parse().map_err(|_| invalid())?),
            "depth" => {
                let (lo, hi) = value.split_once("..").ok_or_else(invalid)?;
                self.min_depth = Some(lo.trim().parse().map_err(|_| invalid())?);
                self.max_depth = Some(hi.trim().parse().map_err(|_| invalid())?);
            }
            "min_rooms" | "min_rooms_per_floor" => {
                self.min_rooms_per_floor = Some(parse_extent(value).ok_or_else(invalid)?)
            }
            "max_rooms" | "max_rooms_per_floor" => {
                self.max_rooms_per_floor = Some(parse_extent(value).ok_or_else(invalid)?)
            }
            "start" | "start_direction" => {
                self.start_direction = Some(value.parse().map_err(|_| invalid())?)
            }
            "packed" => {
                self.packed = Some(match value {
                    "true" | "yes" | "1" => true,
                    "false" | "no" | "0" => false,
                    _ => return Err(invalid()),
                })
            }
            _ => return Err(OptionsError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Convert options to config file format
    ///
    /// Unset fields are omitted so they keep resolving to defaults.
    pub fn to_config_string(&self) -> String {
        let mut opts = Vec::new();
        if let Some(seed) = self.seed {
            opts.push(format!("seed:{}", seed));
        }
        if let Some(size) = self.room_size {
            opts.push(format!("room_size:{}", size));
        }
        if let Some(depth) = self.min_depth {
            opts.push(format!("min_depth:{}", depth));
        }
        if let Some(depth) = self.max_depth {
            opts.push(format!("max_depth:{}", depth));
        }
        if let Some(rooms) = self.min_rooms_per_floor {
            opts.push(format!("min_rooms:{}", rooms));
        }
        if let Some(rooms) = self.max_rooms_per_floor {
            opts.push(format!("max_rooms:{}", rooms));
        }
        if let Some(dir) = self.start_direction {
            opts.push(format!("start:{}", dir));
        }
        if let Some(packed) = self.packed {
            opts.push(if packed { "packed" } else { "!packed" }.to_string());
        }

        let mut lines = vec!["# dungeon layout options".to_string()];
        if !opts.is_empty() {
            lines.push(format!("OPTIONS={}", opts.join(",")));
        }
        lines.join("\n")
    }
}

/// Parse `WxH`
fn parse_extent(value: &str) -> Option<Extent> {
    let (w, h) = value.split_once(['x', 'X'])?;
    Some(Extent::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Options parsing and validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),

    #[error("Missing value for option '{0}'")]
    MissingValue(String),

    #[error("Range for '{0}' is inverted: {1}")]
    InvertedRange(String, String),

    #[error("Extent for '{0}' must be positive on both axes, got {1}")]
    NonPositiveExtent(String, Extent),

    #[error("Value {1} for '{0}' exceeds the limit of {2}")]
    ExceedsLimit(String, String, String),

    #[error("Unpacked floors are not implemented")]
    UnpackedUnsupported,
}
