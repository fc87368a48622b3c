//! Floor grid: a fixed rectangle of room slots
//!
//! Slots start uncarved and only ever move to carved. Once carved, a room's
//! origin and depth are frozen; only its door and terminal flags change.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::geometry::{CardinalDirection, CompassDirection, Coord, Extent};

use super::room::{Exits, Room};

/// One floor of the dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FloorGrid")]
pub struct Floor {
    extent: Extent,
    room_size: Extent,
    /// Indexed `[x][y]`; `None` is an uncarved slot
    rooms: Vec<Vec<Option<Room>>>,
    start: Coord,
    end: Coord,
    /// Walk ids handed out while building
    walks: u32,
}

/// Unchecked wire form of a `Floor`
#[derive(Deserialize)]
struct FloorGrid {
    extent: Extent,
    room_size: Extent,
    rooms: Vec<Vec<Option<Room>>>,
    start: Coord,
    end: Coord,
    walks: u32,
}

impl TryFrom<FloorGrid> for Floor {
    type Error = GenError;

    fn try_from(grid: FloorGrid) -> Result<Self> {
        let extent = grid.extent;
        let columns_match = extent.width >= 0
            && extent.height >= 0
            && grid.rooms.len() == extent.width as usize
            && grid
                .rooms
                .iter()
                .all(|column| column.len() == extent.height as usize);
        if !columns_match {
            return Err(GenError::MalformedGrid(extent));
        }
        for coord in [grid.start, grid.end] {
            if !extent.contains(coord) {
                return Err(GenError::OutOfBounds { coord, extent });
            }
        }
        Ok(Self {
            extent,
            room_size: grid.room_size,
            rooms: grid.rooms,
            start: grid.start,
            end: grid.end,
            walks: grid.walks,
        })
    }
}

impl Floor {
    /// Create an empty floor; both extents must be positive
    pub fn new(extent: Extent, room_size: Extent) -> Self {
        let width = extent.width.max(0) as usize;
        let height = extent.height.max(0) as usize;
        Self {
            extent,
            room_size,
            rooms: vec![vec![None; height]; width],
            start: Coord::ORIGIN,
            end: Coord::ORIGIN,
            walks: 0,
        }
    }

    /// Grid dimensions in rooms
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Tile dimensions of every room on this floor
    pub fn room_size(&self) -> Extent {
        self.room_size
    }

    /// Entrance cell, shared with the previous floor's end
    pub fn start(&self) -> Coord {
        self.start
    }

    /// Exit cell, the next floor's start
    pub fn end(&self) -> Coord {
        self.end
    }

    /// Number of carving walks it took to fill the floor
    pub fn walk_count(&self) -> u32 {
        self.walks
    }

    pub(crate) fn set_endpoints(&mut self, start: Coord, end: Coord) {
        self.start = start;
        self.end = end;
    }

    pub(crate) fn set_walk_count(&mut self, walks: u32) {
        self.walks = walks;
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.extent.contains(coord)
    }

    fn check_bounds(&self, coord: Coord) -> Result<()> {
        if self.is_in_bounds(coord) {
            Ok(())
        } else {
            Err(GenError::OutOfBounds {
                coord,
                extent: self.extent,
            })
        }
    }

    /// Room at `coord`, `None` if the slot is still uncarved
    pub fn room_at(&self, coord: Coord) -> Result<Option<&Room>> {
        self.check_bounds(coord)?;
        Ok(self.rooms[coord.x as usize][coord.y as usize].as_ref())
    }

    fn room_at_mut(&mut self, coord: Coord) -> Result<&mut Room> {
        self.check_bounds(coord)?;
        self.rooms[coord.x as usize][coord.y as usize]
            .as_mut()
            .ok_or(GenError::NotCarved(coord))
    }

    /// Carve a room at `coord` unless one is already there
    ///
    /// Returns whether a new room was created. An existing room keeps its
    /// origin and depth.
    pub fn carve_room(&mut self, coord: Coord, origin: u32, depth: u32) -> Result<bool> {
        self.check_bounds(coord)?;
        let slot = &mut self.rooms[coord.x as usize][coord.y as usize];
        if slot.is_some() {
            return Ok(false);
        }
        *slot = Some(Room::new(origin, depth));
        Ok(true)
    }

    pub(crate) fn mark_terminal(&mut self, coord: Coord) -> Result<()> {
        self.room_at_mut(coord)?.terminal = true;
        Ok(())
    }

    /// Every slot holds a carved room
    pub fn is_filled(&self) -> bool {
        self.rooms
            .iter()
            .flatten()
            .all(|slot| slot.is_some_and(|room| room.origin != 0))
    }

    /// First uncarved slot, scanning columns left to right and each column
    /// top to bottom
    pub fn first_uncarved(&self) -> Option<Coord> {
        for (x, column) in self.rooms.iter().enumerate() {
            for (y, slot) in column.iter().enumerate() {
                if slot.is_none() {
                    return Some(Coord::new(x as i32, y as i32));
                }
            }
        }
        None
    }

    /// Put a door between two grid-adjacent rooms
    ///
    /// The door is stored on whichever room lies south or west of the other,
    /// as its `exit_north` or `exit_east`.
    pub fn join(&mut self, a: Coord, b: Coord) -> Result<()> {
        if !a.is_adjacent(b) {
            return Err(GenError::NotAdjacent { from: a, to: b });
        }

        let (from, to) = match a.bearing_to(b) {
            CompassDirection::South | CompassDirection::West => (b, a),
            _ => (a, b),
        };

        match from.bearing_to(to) {
            CompassDirection::North => self.room_at_mut(from)?.exit_north = true,
            CompassDirection::East => self.room_at_mut(from)?.exit_east = true,
            facing => return Err(GenError::NonCanonicalJoin { from, to, facing }),
        }
        Ok(())
    }

    /// All four doors of the room at `coord`
    ///
    /// South and west doors are read from the neighbours. An uncarved slot
    /// has no doors.
    pub fn exits(&self, coord: Coord) -> Result<Exits> {
        let mut exits = Exits::empty();
        let Some(room) = self.room_at(coord)? else {
            return Ok(exits);
        };

        exits.set(Exits::NORTH, room.exit_north);
        exits.set(Exits::EAST, room.exit_east);

        let below = coord.moved(CardinalDirection::South);
        if self.is_in_bounds(below) {
            if let Some(neighbor) = self.room_at(below)? {
                exits.set(Exits::SOUTH, neighbor.exit_north);
            }
        }
        let left = coord.moved(CardinalDirection::West);
        if self.is_in_bounds(left) {
            if let Some(neighbor) = self.room_at(left)? {
                exits.set(Exits::WEST, neighbor.exit_east);
            }
        }
        Ok(exits)
    }

    /// Carved rooms in scan order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Room)> + '_ {
        self.rooms.iter().enumerate().flat_map(|(x, column)| {
            column.iter().enumerate().filter_map(move |(y, slot)| {
                slot.as_ref().map(|room| (Coord::new(x as i32, y as i32), room))
            })
        })
    }

    /// Every door once, as the pair of cells it connects
    pub fn doors(&self) -> Vec<(Coord, Coord)> {
        let mut doors = Vec::new();
        for (coord, room) in self.iter() {
            if room.exit_north {
                doors.push((coord, coord.moved(CardinalDirection::North)));
            }
            if room.exit_east {
                doors.push((coord, coord.moved(CardinalDirection::East)));
            }
        }
        doors
    }

    /// Rooms flagged as dead ends by their walk
    pub fn terminal_rooms(&self) -> Vec<Coord> {
        self.iter()
            .filter(|(_, room)| room.terminal)
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Carved rooms without a single door
    pub fn isolated_rooms(&self) -> Vec<Coord> {
        self.iter()
            .map(|(coord, _)| coord)
            .filter(|coord| self.exits(*coord).is_ok_and(|e| e.is_empty()))
            .collect()
    }

    /// Number of carved rooms reachable from `from` through doors
    pub fn reachable_from(&self, from: Coord) -> Result<usize> {
        if self.room_at(from)?.is_none() {
            return Ok(0);
        }

        let height = self.extent.height as usize;
        let mut seen = vec![false; self.extent.area() as usize];
        let index = |c: Coord| c.x as usize * height + c.y as usize;

        let mut queue = VecDeque::from([from]);
        seen[index(from)] = true;
        let mut count = 0;

        while let Some(coord) = queue.pop_front() {
            count += 1;
            let exits = self.exits(coord)?;
            for (flag, dir) in [
                (Exits::NORTH, CardinalDirection::North),
                (Exits::EAST, CardinalDirection::East),
                (Exits::SOUTH, CardinalDirection::South),
                (Exits::WEST, CardinalDirection::West),
            ] {
                if !exits.contains(flag) {
                    continue;
                }
                let next = coord.moved(dir);
                if self.is_in_bounds(next) && !seen[index(next)] {
                    seen[index(next)] = true;
                    queue.push_back(next);
                }
            }
        }
        Ok(count)
    }

    /// Every room can be reached from the start cell
    pub fn is_connected(&self) -> bool {
        self.reachable_from(self.start)
            .is_ok_and(|n| n as i64 == self.extent.area())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carved(extent: Extent) -> Floor {
        let mut floor = Floor::new(extent, Extent::new(12, 9));
        for x in 0..extent.width {
            for y in 0..extent.height {
                floor.carve_room(Coord::new(x, y), 1, 1).unwrap();
            }
        }
        floor
    }

    #[test]
    fn test_new_floor_is_empty() {
        let floor = Floor::new(Extent::new(3, 2), Extent::new(12, 9));
        assert!(!floor.is_filled());
        assert_eq!(floor.first_uncarved(), Some(Coord::new(0, 0)));
        assert_eq!(floor.room_at(Coord::new(2, 1)), Ok(None));
        assert_eq!(floor.iter().count(), 0);
    }

    #[test]
    fn test_room_at_out_of_bounds() {
        let floor = Floor::new(Extent::new(3, 2), Extent::new(12, 9));
        assert!(matches!(
            floor.room_at(Coord::new(3, 0)),
            Err(GenError::OutOfBounds { .. })
        ));
        assert!(floor.room_at(Coord::new(0, -1)).is_err());
        assert!(!floor.is_in_bounds(Coord::new(-1, 0)));
        assert!(floor.is_in_bounds(Coord::new(2, 1)));
    }

    #[test]
    fn test_carve_room_keeps_first_origin() {
        let mut floor = Floor::new(Extent::new(2, 2), Extent::new(12, 9));
        assert_eq!(floor.carve_room(Coord::new(1, 1), 4, 2), Ok(true));
        assert_eq!(floor.carve_room(Coord::new(1, 1), 9, 1), Ok(false));
        let room = floor.room_at(Coord::new(1, 1)).unwrap().unwrap();
        assert_eq!((room.origin, room.depth), (4, 2));
    }

    #[test]
    fn test_deserialize_checks_grid_shape() {
        let floor = carved(Extent::new(3, 2));
        let json = serde_json::to_string(&floor).unwrap();
        let back: Floor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, floor);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["extent"]["width"] = 5.into();
        assert!(serde_json::from_value::<Floor>(value).is_err());

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["rooms"][1] = serde_json::json!([null]);
        assert!(serde_json::from_value::<Floor>(value).is_err());

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["end"]["y"] = 7.into();
        assert!(serde_json::from_value::<Floor>(value).is_err());
    }

    #[test]
    fn test_first_uncarved_scans_columns() {
        let mut floor = Floor::new(Extent::new(2, 2), Extent::new(12, 9));
        floor.carve_room(Coord::new(0, 0), 1, 1).unwrap();
        assert_eq!(floor.first_uncarved(), Some(Coord::new(0, 1)));
        floor.carve_room(Coord::new(0, 1), 1, 2).unwrap();
        assert_eq!(floor.first_uncarved(), Some(Coord::new(1, 0)));
    }

    #[test]
    fn test_filled() {
        let floor = carved(Extent::new(3, 3));
        assert!(floor.is_filled());
        assert_eq!(floor.first_uncarved(), None);
    }

    #[test]
    fn test_join_north_and_south_store_the_same_flag() {
        let mut floor = carved(Extent::new(2, 2));
        floor.join(Coord::new(0, 1), Coord::new(0, 0)).unwrap();
        let lower = floor.room_at(Coord::new(0, 1)).unwrap().unwrap();
        assert!(lower.exit_north);
        assert!(!floor.room_at(Coord::new(0, 0)).unwrap().unwrap().exit_north);

        let mut other = carved(Extent::new(2, 2));
        other.join(Coord::new(0, 0), Coord::new(0, 1)).unwrap();
        assert_eq!(floor, other);
    }

    #[test]
    fn test_join_east_and_west_store_the_same_flag() {
        let mut floor = carved(Extent::new(2, 2));
        floor.join(Coord::new(1, 0), Coord::new(0, 0)).unwrap();
        let left = floor.room_at(Coord::new(0, 0)).unwrap().unwrap();
        assert!(left.exit_east);
        assert!(!left.exit_north);
        assert!(!floor.room_at(Coord::new(1, 0)).unwrap().unwrap().exit_east);
    }

    #[test]
    fn test_join_rejects_non_adjacent() {
        let mut floor = carved(Extent::new(3, 3));
        for (a, b) in [
            (Coord::new(0, 0), Coord::new(1, 1)),
            (Coord::new(0, 0), Coord::new(2, 0)),
            (Coord::new(1, 1), Coord::new(1, 1)),
        ] {
            assert_eq!(
                floor.join(a, b),
                Err(GenError::NotAdjacent { from: a, to: b })
            );
        }
        assert!(floor.doors().is_empty());
    }

    #[test]
    fn test_join_requires_carved_room() {
        let mut floor = Floor::new(Extent::new(2, 1), Extent::new(12, 9));
        assert_eq!(
            floor.join(Coord::new(0, 0), Coord::new(1, 0)),
            Err(GenError::NotCarved(Coord::new(0, 0)))
        );
    }

    #[test]
    fn test_exits_reconstruct_south_and_west() {
        let mut floor = carved(Extent::new(3, 3));
        let center = Coord::new(1, 1);
        floor.join(center, Coord::new(1, 0)).unwrap();
        floor.join(center, Coord::new(2, 1)).unwrap();
        floor.join(center, Coord::new(1, 2)).unwrap();
        floor.join(center, Coord::new(0, 1)).unwrap();

        assert_eq!(floor.exits(center), Ok(Exits::all()));
        assert_eq!(floor.exits(Coord::new(1, 2)), Ok(Exits::NORTH));
        assert_eq!(floor.exits(Coord::new(0, 1)), Ok(Exits::EAST));
        assert_eq!(floor.exits(Coord::new(1, 0)), Ok(Exits::SOUTH));
        assert_eq!(floor.exits(Coord::new(2, 1)), Ok(Exits::WEST));
        assert_eq!(floor.exits(Coord::new(0, 0)), Ok(Exits::empty()));
        assert_eq!(floor.doors().len(), 4);
    }

    #[test]
    fn test_connectivity_queries() {
        let mut floor = carved(Extent::new(3, 1));
        floor.set_endpoints(Coord::new(0, 0), Coord::new(2, 0));
        floor.join(Coord::new(0, 0), Coord::new(1, 0)).unwrap();
        assert_eq!(floor.reachable_from(Coord::new(0, 0)), Ok(2));
        assert!(!floor.is_connected());
        assert_eq!(floor.isolated_rooms(), vec![Coord::new(2, 0)]);

        floor.join(Coord::new(2, 0), Coord::new(1, 0)).unwrap();
        assert!(floor.is_connected());
        assert!(floor.isolated_rooms().is_empty());
    }

    #[test]
    fn test_terminal_rooms() {
        let mut floor = carved(Extent::new(2, 1));
        floor.mark_terminal(Coord::new(1, 0)).unwrap();
        assert_eq!(floor.terminal_rooms(), vec![Coord::new(1, 0)]);
    }
}
