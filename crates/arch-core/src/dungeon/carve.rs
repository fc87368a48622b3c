//! Carving walk
//!
//! A walk is a depth-first carver. From its current cell it tries the four
//! cardinal directions, starting from a random one and turning clockwise
//! each time:
//!
//! - an uncarved neighbour is carved by the same walk, doored, and walked into
//! - a neighbour carved by another walk is doored and ends the walk, but only
//!   when merging is allowed
//! - a neighbour carved by the same walk is skipped
//!
//! A cell where every direction is refused becomes a terminal room and the
//! walk backs up to its parent. The path is kept on an explicit stack, so
//! walk length is bounded by the heap rather than the thread stack.

use tracing::trace;

use crate::error::Result;
use crate::geometry::{CardinalDirection, Coord};
use crate::rng::GameRng;

use super::floor::Floor;

/// One cell on the walk's current path
#[derive(Debug, Clone, Copy)]
struct Step {
    coord: Coord,
    depth: u32,
    /// Next direction to try
    dir: CardinalDirection,
    /// Directions tried so far
    turns: u8,
}

impl Step {
    fn enter(coord: Coord, depth: u32, rng: &mut GameRng) -> Result<Self> {
        Ok(Self {
            coord,
            depth,
            dir: CardinalDirection::random(rng)?,
            turns: 0,
        })
    }
}

/// Run walk `walk` from `coord`, which sits `depth` steps from the walk's root
///
/// With `allow_merge == false` the walk stops as soon as it has extended once
/// from a cell, so it traces a single corridor to a dead end. With merging
/// allowed it keeps backtracking until it touches a room of another walk.
///
/// Returns `true` if the walk extended (unmerged) or merged (mergeable) from
/// this cell, `false` if it backed out of a dead end.
pub fn carve(
    floor: &mut Floor,
    rng: &mut GameRng,
    walk: u32,
    coord: Coord,
    allow_merge: bool,
    depth: u32,
) -> Result<bool> {
    floor.carve_room(coord, walk, depth)?;
    let mut path = vec![Step::enter(coord, depth, rng)?];

    while let Some(step) = path.last_mut() {
        if step.turns == 4 {
            let dead_end = step.coord;
            floor.mark_terminal(dead_end)?;
            path.pop();
            // An unmerged walk is done once any cell has extended.
            if !allow_merge && !path.is_empty() {
                return Ok(true);
            }
            continue;
        }

        let Step { coord, depth, dir, .. } = *step;
        step.dir = dir.rotate(true, 1);
        step.turns += 1;

        let next = coord.moved(dir);
        if !floor.is_in_bounds(next) {
            continue;
        }
        match floor.room_at(next)?.map(|room| room.origin) {
            None => {
                floor.carve_room(next, walk, depth + 1)?;
                floor.join(coord, next)?;
                path.push(Step::enter(next, depth + 1, rng)?);
            }
            Some(origin) if origin != walk => {
                if allow_merge {
                    floor.join(coord, next)?;
                    trace!(walk, into = origin, at = %coord, "walk merged");
                    return Ok(true);
                }
            }
            Some(_) => {}
        }
    }

    Ok(false)
}
