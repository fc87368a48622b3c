//! Dungeon orchestrator
//!
//! Draws the floor count, the shared floor extent and the entrance, then
//! builds floors in order, each entered where the previous one ends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geometry::{Coord, Extent};
use crate::options::{DungeonOptions, GenerationParams, StartDirection};
use crate::rng::GameRng;

use super::builder::build_floor;
use super::floor::Floor;

impl StartDirection {
    /// Replace `DontCare` with a uniformly drawn concrete edge
    pub fn resolve(self, rng: &mut GameRng) -> StartDirection {
        match self {
            StartDirection::DontCare => rng
                .choose(&StartDirection::CONCRETE)
                .copied()
                .unwrap_or(StartDirection::Up),
            concrete => concrete,
        }
    }

    /// Entrance cell on a grid of `extent` for this edge
    pub fn start_cell(self, extent: Extent, rng: &mut GameRng) -> Result<Coord> {
        Ok(match self {
            StartDirection::Up => extent.random_interior(rng, 0)?,
            StartDirection::East => Coord::new(extent.width - 1, rng.range(0, extent.height)),
            StartDirection::West => Coord::new(0, rng.range(0, extent.height)),
            StartDirection::North => Coord::new(rng.range(0, extent.width), 0),
            StartDirection::South => Coord::new(rng.range(0, extent.width), extent.height - 1),
            StartDirection::DontCare => return self.resolve(rng).start_cell(extent, rng),
        })
    }
}

/// A generated multi-floor dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    floors: Vec<Floor>,
    params: GenerationParams,
    floor_extent: Extent,
    start: Coord,
    start_direction: StartDirection,
    /// Seed that regenerates this dungeon through `generate`
    replay_seed: Option<u64>,
}

impl Dungeon {
    /// Resolve `options` and generate
    ///
    /// Without a seed a fresh one is drawn; `seed()` reports it afterwards.
    /// A dungeon built here can always be replayed from that seed.
    pub fn generate(options: &DungeonOptions) -> Result<Self> {
        let params = options.resolve()?;
        let mut rng = match options.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self::generate_with(params, &mut rng)
    }

    /// Generate from resolved parameters with a caller-owned RNG
    ///
    /// The result is only replayable from a seed when `rng` had not been
    /// drawn from yet; otherwise `seed()` is `None`.
    pub fn generate_with(params: GenerationParams, rng: &mut GameRng) -> Result<Self> {
        params.validate()?;
        let replay_seed = rng.is_fresh().then_some(rng.seed());

        let (lo, hi) = (params.min_rooms_per_floor, params.max_rooms_per_floor);
        let floor_extent = Extent::new(
            rng.range_inclusive(lo.width, hi.width),
            rng.range_inclusive(lo.height, hi.height),
        );
        let depth = params.min_depth + rng.rn2(params.max_depth - params.min_depth + 1);

        let start_direction = params.start_direction.resolve(rng);
        let start = start_direction.start_cell(floor_extent, rng)?;

        let mut floors = Vec::with_capacity(depth as usize);
        let mut entry = start;
        for _ in 0..depth {
            let floor = build_floor(floor_extent, params.room_size, entry, rng)?;
            entry = floor.end();
            floors.push(floor);
        }

        debug!(
            seed = rng.seed(),
            replayable = replay_seed.is_some(),
            floors = depth,
            %floor_extent,
            %start_direction,
            %start,
            "dungeon generated"
        );

        Ok(Self {
            floors,
            params,
            floor_extent,
            start,
            start_direction,
            replay_seed,
        })
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, index: usize) -> Option<&Floor> {
        self.floors.get(index)
    }

    pub fn num_floors(&self) -> usize {
        self.floors.len()
    }

    /// Rooms-per-floor grid shared by every floor
    pub fn floor_extent(&self) -> Extent {
        self.floor_extent
    }

    /// Entrance cell of the first floor
    pub fn start(&self) -> Coord {
        self.start
    }

    /// The entrance edge after `DontCare` was resolved
    pub fn start_direction(&self) -> StartDirection {
        self.start_direction
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Seed that reproduces this dungeon through `generate`
    ///
    /// `None` when `generate_with` was handed an RNG that was already in use.
    pub fn seed(&self) -> Option<u64> {
        self.replay_seed
    }
}
