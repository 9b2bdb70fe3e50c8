//! Canonical wall model shared by builders, searches and the move resolver.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Direction, MazeError, Position, MAX_WALLS};

/// Raw wall on the side of `position` facing `direction`.
///
/// The same physical wall can be recorded from either of the two cells it
/// separates; use [`Wall::canonical_id`] to compare walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    /// Cell the wall was recorded from.
    pub position: Position,
    /// Side of the cell the wall sits on.
    pub direction: Direction,
}

impl Wall {
    /// Creates a raw wall descriptor.
    #[must_use]
    pub const fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Deduplication key for the wall.
    ///
    /// Interior walls are keyed by the smaller of the two adjacent cells and
    /// the direction leading away from it. Boundary walls key to themselves.
    #[must_use]
    pub fn canonical_id(&self) -> WallId {
        let neighbor = self.position.neighbor(self.direction);
        if !neighbor.in_bounds() || self.position <= neighbor {
            WallId {
                cell: self.position,
                direction: self.direction,
            }
        } else {
            WallId {
                cell: neighbor,
                direction: self.direction.opposite(),
            }
        }
    }
}

/// Canonical identifier of a logical wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId {
    cell: Position,
    direction: Direction,
}

impl WallId {
    /// Canonical cell the wall is anchored to.
    #[must_use]
    pub const fn cell(&self) -> Position {
        self.cell
    }

    /// Direction of the wall as seen from [`WallId::cell`].
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Reports whether the wall lies on the outer edge of the board.
    #[must_use]
    pub const fn is_boundary(&self) -> bool {
        !self.cell.neighbor(self.direction).in_bounds()
    }

    /// Raw wall recorded from the canonical side.
    #[must_use]
    pub const fn as_wall(&self) -> Wall {
        Wall::new(self.cell, self.direction)
    }
}

/// Counts the logical walls in a list of raw walls.
#[must_use]
pub fn count_distinct(walls: &[Wall]) -> usize {
    walls
        .iter()
        .map(Wall::canonical_id)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Deduplicated set of walls that never exceeds [`MAX_WALLS`] entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Wall>", into = "Vec<Wall>")]
pub struct WallSet {
    ids: BTreeSet<WallId>,
}

impl WallSet {
    /// Creates an empty wall set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wall, returning `false` when the logical wall was already present.
    ///
    /// The budget is checked before insertion so a rejected wall leaves the set
    /// untouched.
    pub fn insert(&mut self, wall: Wall) -> Result<bool, MazeError> {
        if !wall.position.in_bounds() {
            return Err(MazeError::OutOfBounds {
                position: wall.position,
            });
        }

        let id = wall.canonical_id();
        if self.ids.contains(&id) {
            return Ok(false);
        }

        if self.ids.len() >= MAX_WALLS {
            return Err(MazeError::WallBudgetExceeded { limit: MAX_WALLS });
        }

        Ok(self.ids.insert(id))
    }

    /// Removes a wall recorded from either side, returning whether it existed.
    pub fn remove(&mut self, wall: Wall) -> bool {
        wall.position.in_bounds() && self.ids.remove(&wall.canonical_id())
    }

    /// Removes the wall when present, otherwise inserts it.
    ///
    /// Returns whether the wall is present after the call.
    pub fn toggle(&mut self, wall: Wall) -> Result<bool, MazeError> {
        if !wall.position.in_bounds() {
            return Err(MazeError::OutOfBounds {
                position: wall.position,
            });
        }
        if self.remove(wall) {
            return Ok(false);
        }
        self.insert(wall).map(|_| true)
    }

    /// Reports whether the logical wall is present.
    #[must_use]
    pub fn contains(&self, wall: Wall) -> bool {
        self.ids.contains(&wall.canonical_id())
    }

    /// Reports whether a wall separates two adjacent cells.
    ///
    /// Non-adjacent pairs are never blocked by a single wall.
    #[must_use]
    pub fn blocks(&self, from: Position, to: Position) -> bool {
        from.direction_to(to)
            .is_some_and(|direction| self.contains(Wall::new(from, direction)))
    }

    /// Number of logical walls in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Reports whether the set holds no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Walls that can still be placed before the budget is exhausted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        MAX_WALLS.saturating_sub(self.ids.len())
    }

    /// Iterator over canonical wall identifiers in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = WallId> + '_ {
        self.ids.iter().copied()
    }

    /// Raw walls recorded from their canonical side.
    #[must_use]
    pub fn to_walls(&self) -> Vec<Wall> {
        self.ids.iter().map(WallId::as_wall).collect()
    }
}

impl TryFrom<Vec<Wall>> for WallSet {
    type Error = MazeError;

    fn try_from(walls: Vec<Wall>) -> Result<Self, Self::Error> {
        let mut set = WallSet::new();
        for wall in walls {
            let _ = set.insert(wall)?;
        }
        Ok(set)
    }
}

impl From<WallSet> for Vec<Wall> {
    fn from(set: WallSet) -> Self {
        set.to_walls()
    }
}
