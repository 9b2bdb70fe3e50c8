//! Validated, immutable mazes.

use maze_duel_core::{MazeError, MazeLayout, MazeView, Position, WallSet};
use maze_duel_system_reachability::shortest_path;
use serde::{Deserialize, Serialize};

/// Maze whose endpoints are distinct, on the board, and connected.
///
/// A `Maze` can only be obtained through validation, including when it is
/// decoded from a stored snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeLayout", into = "MazeLayout")]
pub struct Maze {
    start: Position,
    end: Position,
    walls: WallSet,
}

impl Maze {
    /// Validates the endpoints and connectivity of a maze.
    pub fn new(start: Position, end: Position, walls: WallSet) -> Result<Self, MazeError> {
        for position in [start, end] {
            if !position.in_bounds() {
                return Err(MazeError::OutOfBounds { position });
            }
        }

        if start == end {
            return Err(MazeError::EndMatchesStart);
        }

        if shortest_path(start, end, &walls).is_none() {
            return Err(MazeError::NoPath);
        }

        Ok(Self { start, end, walls })
    }

    /// Validates a raw layout, deduplicating its walls.
    pub fn from_layout(layout: &MazeLayout) -> Result<Self, MazeError> {
        let walls = WallSet::try_from(layout.walls.clone())?;
        Self::new(layout.start, layout.end, walls)
    }

    /// Raw layout with every wall recorded from its canonical side.
    #[must_use]
    pub fn layout(&self) -> MazeLayout {
        MazeLayout {
            start: self.start,
            end: self.end,
            walls: self.walls.to_walls(),
        }
    }

    /// Shortest route from start to end, both inclusive.
    #[must_use]
    pub fn solution(&self) -> Vec<Position> {
        shortest_path(self.start, self.end, &self.walls).unwrap_or_default()
    }
}

impl MazeView for Maze {
    fn start(&self) -> Position {
        self.start
    }

    fn end(&self) -> Position {
        self.end
    }

    fn walls(&self) -> &WallSet {
        &self.walls
    }
}

impl TryFrom<MazeLayout> for Maze {
    type Error = MazeError;

    fn try_from(layout: MazeLayout) -> Result<Self, Self::Error> {
        Self::from_layout(&layout)
    }
}

impl From<Maze> for MazeLayout {
    fn from(maze: Maze) -> Self {
        maze.layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_duel_core::{Direction, Wall};

    fn layout(walls: Vec<Wall>) -> MazeLayout {
        MazeLayout {
            start: Position::new(0, 0),
            end: Position::new(0, 1),
            walls,
        }
    }

    #[test]
    fn open_layout_validates() {
        let maze = Maze::from_layout(&layout(Vec::new())).expect("valid maze");
        assert_eq!(
            maze.solution(),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn sealed_start_is_rejected() {
        let walls = vec![
            Wall::new(Position::new(0, 0), Direction::Right),
            Wall::new(Position::new(0, 0), Direction::Down),
        ];
        assert_eq!(Maze::from_layout(&layout(walls)), Err(MazeError::NoPath));
    }

    #[test]
    fn identical_endpoints_are_rejected() {
        let walls = WallSet::new();
        assert_eq!(
            Maze::new(Position::new(2, 2), Position::new(2, 2), walls),
            Err(MazeError::EndMatchesStart)
        );
    }

    #[test]
    fn off_board_endpoints_are_rejected() {
        let position = Position::new(0, 8);
        assert_eq!(
            Maze::new(Position::new(0, 0), position, WallSet::new()),
            Err(MazeError::OutOfBounds { position })
        );
    }

    #[test]
    fn duplicated_raw_walls_count_once() {
        let walls = vec![
            Wall::new(Position::new(3, 3), Direction::Right),
            Wall::new(Position::new(3, 4), Direction::Left),
        ];
        let maze = Maze::from_layout(&layout(walls)).expect("valid maze");
        assert_eq!(maze.walls().len(), 1);
    }

    #[test]
    fn stored_mazes_are_revalidated() {
        let json = r#"{"start":{"row":1,"col":1},"end":{"row":1,"col":1},"walls":[]}"#;
        assert!(serde_json::from_str::<Maze>(json).is_err());
    }
}
