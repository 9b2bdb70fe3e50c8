#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first reachability over the maze board.
//!
//! Searches treat every wall as a bidirectional block between the two cells it
//! separates, no matter which side the wall was recorded from.

use std::collections::VecDeque;

use maze_duel_core::{Direction, Position, WallSet, BOARD_SIZE};

const CELL_COUNT: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

/// Sentinel distance for cells the search never reached.
pub const UNREACHABLE: u16 = u16::MAX;

/// Dense distance grid produced by a breadth-first search from one origin.
///
/// Neighbours are expanded in the fixed order up, down, left, right, so the
/// predecessor recorded for each cell is deterministic.
#[derive(Clone, Debug)]
pub struct DistanceField {
    origin: Position,
    distances: [u16; CELL_COUNT],
    parents: [Option<Position>; CELL_COUNT],
}

impl DistanceField {
    /// Runs the search from `origin` honouring `walls`.
    ///
    /// An origin outside the board yields a field where nothing is reachable.
    #[must_use]
    pub fn from_origin(origin: Position, walls: &WallSet) -> Self {
        let mut field = Self {
            origin,
            distances: [UNREACHABLE; CELL_COUNT],
            parents: [None; CELL_COUNT],
        };

        let Some(origin_index) = index(origin) else {
            return field;
        };
        field.distances[origin_index] = 0;

        let mut queue = VecDeque::with_capacity(CELL_COUNT);
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(cell) else {
                continue;
            };
            let next_distance = field.distances[current_index].saturating_add(1);

            for direction in Direction::ALL {
                let neighbor = cell.neighbor(direction);
                let Some(neighbor_index) = index(neighbor) else {
                    continue;
                };

                if field.distances[neighbor_index] != UNREACHABLE {
                    continue;
                }

                if walls.blocks(cell, neighbor) {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                field.parents[neighbor_index] = Some(cell);
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Cell the search started from.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Step count from the origin, if the cell is on the board and reachable.
    #[must_use]
    pub fn distance(&self, cell: Position) -> Option<u16> {
        index(cell)
            .map(|offset| self.distances[offset])
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Reports whether the cell can be reached from the origin.
    #[must_use]
    pub fn reaches(&self, cell: Position) -> bool {
        self.distance(cell).is_some()
    }

    /// Number of cells reachable from the origin, the origin included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHABLE)
            .count()
    }

    /// Reconstructs the path from the origin to `target`, both inclusive.
    #[must_use]
    pub fn path_to(&self, target: Position) -> Option<Vec<Position>> {
        let _ = self.distance(target)?;

        let mut path = vec![target];
        let mut cursor = target;
        while cursor != self.origin {
            cursor = self.parents[index(cursor)?]?;
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }
}

/// Reports whether `end` is reachable from `start`.
#[must_use]
pub fn is_connected(start: Position, end: Position, walls: &WallSet) -> bool {
    DistanceField::from_origin(start, walls).reaches(end)
}

/// Shortest path from `start` to `end`, both inclusive, or `None` when the
/// walls disconnect them.
#[must_use]
pub fn shortest_path(start: Position, end: Position, walls: &WallSet) -> Option<Vec<Position>> {
    DistanceField::from_origin(start, walls).path_to(end)
}

fn index(cell: Position) -> Option<usize> {
    if !cell.in_bounds() {
        return None;
    }
    let row = usize::try_from(cell.row()).ok()?;
    let col = usize::try_from(cell.col()).ok()?;
    let width = usize::try_from(BOARD_SIZE).ok()?;
    Some(row * width + col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_duel_core::Wall;

    #[test]
    fn origin_has_zero_distance() {
        let field = DistanceField::from_origin(Position::new(3, 4), &WallSet::new());
        assert_eq!(field.distance(Position::new(3, 4)), Some(0));
        assert_eq!(field.distance(Position::new(0, 0)), Some(7));
        assert_eq!(field.reachable_count(), 64);
    }

    #[test]
    fn off_board_origin_reaches_nothing() {
        let field = DistanceField::from_origin(Position::new(-1, 0), &WallSet::new());
        assert_eq!(field.reachable_count(), 0);
        assert_eq!(field.path_to(Position::new(0, 0)), None);
    }

    #[test]
    fn walls_force_detours() {
        let mut walls = WallSet::new();
        let _ = walls
            .insert(Wall::new(Position::new(0, 0), Direction::Right))
            .expect("insert");
        let field = DistanceField::from_origin(Position::new(0, 0), &walls);
        assert_eq!(field.distance(Position::new(0, 1)), Some(3));
    }
}
