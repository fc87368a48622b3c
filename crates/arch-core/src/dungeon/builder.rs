//! Packed floor builder
//!
//! Carves one floor: a dead-end corridor from the start cell, a mergeable walk
//! from a far-away end cell, then mergeable walks from every cell still left
//! uncarved until the whole grid is filled.

use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Coord, Extent};
use crate::rng::GameRng;

use super::carve::carve;
use super::floor::Floor;
use super::room::{END_WALK, START_WALK};

/// Random cells sampled when looking for an end far from the start
pub const END_CANDIDATES: usize = 5;

/// Pick the sampled cell farthest from `start`
///
/// Ties keep the earlier sample; if no sample beats distance 0 the end is the
/// start itself.
pub fn pick_end(extent: Extent, start: Coord, rng: &mut GameRng) -> Result<Coord> {
    let mut end = start;
    let mut best = 0.0;
    for _ in 0..END_CANDIDATES {
        let candidate = extent.random_interior(rng, 0)?;
        let distance = candidate.distance(start);
        if distance > best {
            end = candidate;
            best = distance;
        }
    }
    Ok(end)
}

/// Build a fully carved floor entered at `start`
pub fn build_floor(
    extent: Extent,
    room_size: Extent,
    start: Coord,
    rng: &mut GameRng,
) -> Result<Floor> {
    let mut floor = Floor::new(extent, room_size);

    let end = pick_end(extent, start, rng)?;
    floor.set_endpoints(start, end);
    floor.carve_room(start, START_WALK, 1)?;
    if end != start {
        floor.carve_room(end, END_WALK, 1)?;
    }

    carve(&mut floor, rng, START_WALK, start, false, 1)?;
    carve(&mut floor, rng, END_WALK, end, true, 1)?;

    let mut walk = END_WALK;
    while let Some(cell) = floor.first_uncarved() {
        walk += 1;
        trace!(walk, at = %cell, "launching walk");
        carve(&mut floor, rng, walk, cell, true, 1)?;
    }
    floor.set_walk_count(walk);

    debug!(
        %extent,
        %start,
        %end,
        walks = walk,
        terminals = floor.terminal_rooms().len(),
        "floor built"
    );
    Ok(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;

    const ROOM: Extent = Extent::new(12, 9);

    #[test]
    fn test_pick_end_prefers_distance() {
        let mut rng = GameRng::new(4);
        let extent = Extent::new(8, 8);
        let start = Coord::new(0, 0);
        let end = pick_end(extent, start, &mut rng).unwrap();
        assert!(extent.contains(end));

        // Replaying the same draws, no sample is farther than the chosen one.
        let mut replay = GameRng::new(4);
        for _ in 0..END_CANDIDATES {
            let c = extent.random_interior(&mut replay, 0).unwrap();
            assert!(c.distance(start) <= end.distance(start));
        }
    }

    #[test]
    fn test_pick_end_single_cell() {
        let mut rng = GameRng::new(4);
        let end = pick_end(Extent::new(1, 1), Coord::new(0, 0), &mut rng).unwrap();
        assert_eq!(end, Coord::new(0, 0));
    }

    #[test]
    fn test_build_floor_fills_grid() {
        for seed in 0..40 {
            let mut rng = GameRng::new(seed);
            let floor = build_floor(Extent::new(5, 4), ROOM, Coord::new(0, 2), &mut rng).unwrap();
            assert!(floor.is_filled(), "seed {}", seed);
            assert!(floor.is_connected(), "seed {}", seed);
            assert!(floor.isolated_rooms().is_empty(), "seed {}", seed);
            assert_eq!(floor.start(), Coord::new(0, 2));
            assert!(floor.room_at(floor.start()).unwrap().unwrap().is_start());
            assert!(floor.walk_count() >= 2);
            assert_eq!(floor.room_size(), ROOM);
        }
    }

    #[test]
    fn test_end_cell_belongs_to_end_walk() {
        for seed in 0..40 {
            let mut rng = GameRng::new(seed);
            let floor = build_floor(Extent::new(4, 4), ROOM, Coord::new(1, 1), &mut rng).unwrap();
            if floor.end() != floor.start() {
                assert!(floor.room_at(floor.end()).unwrap().unwrap().is_end_seed());
            }
        }
    }

    #[test]
    fn test_walk_ids_are_contiguous() {
        let mut rng = GameRng::new(12);
        let floor = build_floor(Extent::new(6, 6), ROOM, Coord::new(3, 0), &mut rng).unwrap();
        for (_, room) in floor.iter() {
            assert!(room.origin >= 1 && room.origin <= floor.walk_count());
        }
    }

    #[test]
    fn test_single_cell_floor() {
        let mut rng = GameRng::new(0);
        let floor = build_floor(Extent::new(1, 1), ROOM, Coord::new(0, 0), &mut rng).unwrap();
        assert!(floor.is_filled());
        assert_eq!(floor.end(), floor.start());
        assert!(floor.doors().is_empty());
        assert_eq!(floor.walk_count(), END_WALK);
        assert!(floor.room_at(Coord::new(0, 0)).unwrap().unwrap().terminal);
    }

    #[test]
    fn test_start_out_of_bounds() {
        let mut rng = GameRng::new(0);
        let err = build_floor(Extent::new(2, 2), ROOM, Coord::new(2, 0), &mut rng).unwrap_err();
        assert!(matches!(err, GenError::OutOfBounds { .. }));
    }
}
