#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interactive maze construction: pick a start, pick an end, then place walls.
//!
//! The builder never hands out an invalid [`Maze`]. Rejected edits leave it
//! exactly as it was so the player can simply try again.

use maze_duel_core::{Command, MazeError, MazeLayout, PlayerId, Position, Wall, WallSet};
use maze_duel_system_reachability::is_connected;
use maze_duel_world::Maze;
use tracing::debug;

/// Step of the construction flow together with the endpoints chosen so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderStage {
    /// Waiting for the start cell.
    PickingStart,
    /// Start chosen, waiting for the end cell.
    PickingEnd {
        /// Chosen start cell.
        start: Position,
    },
    /// Both endpoints chosen; walls may be toggled.
    PlacingWalls {
        /// Chosen start cell.
        start: Position,
        /// Chosen end cell.
        end: Position,
    },
}

/// Stateful maze editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeBuilder {
    stage: BuilderStage,
    walls: WallSet,
}

impl Default for MazeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MazeBuilder {
    /// Creates an empty builder waiting for a start cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: BuilderStage::PickingStart,
            walls: WallSet::new(),
        }
    }

    /// Seeds a builder from an imported layout, ready for wall editing.
    ///
    /// Connectivity is not required here; it is checked again on submit.
    pub fn load(layout: &MazeLayout) -> Result<Self, MazeError> {
        for position in [layout.start, layout.end] {
            if !position.in_bounds() {
                return Err(MazeError::OutOfBounds { position });
            }
        }
        if layout.start == layout.end {
            return Err(MazeError::EndMatchesStart);
        }

        let walls = WallSet::try_from(layout.walls.clone())?;
        Ok(Self {
            stage: BuilderStage::PlacingWalls {
                start: layout.start,
                end: layout.end,
            },
            walls,
        })
    }

    /// Current construction step.
    #[must_use]
    pub const fn stage(&self) -> BuilderStage {
        self.stage
    }

    /// Chosen start cell, if any.
    #[must_use]
    pub const fn start(&self) -> Option<Position> {
        match self.stage {
            BuilderStage::PickingStart => None,
            BuilderStage::PickingEnd { start } | BuilderStage::PlacingWalls { start, .. } => {
                Some(start)
            }
        }
    }

    /// Chosen end cell, if any.
    #[must_use]
    pub const fn end(&self) -> Option<Position> {
        match self.stage {
            BuilderStage::PlacingWalls { end, .. } => Some(end),
            BuilderStage::PickingStart | BuilderStage::PickingEnd { .. } => None,
        }
    }

    /// Walls placed so far.
    #[must_use]
    pub const fn walls(&self) -> &WallSet {
        &self.walls
    }

    /// Walls that can still be added before hitting the budget.
    #[must_use]
    pub fn remaining_walls(&self) -> usize {
        self.walls.remaining()
    }

    /// Chooses the start cell.
    pub fn select_start(&mut self, position: Position) -> Result<(), MazeError> {
        if self.stage != BuilderStage::PickingStart {
            return Err(MazeError::OutOfStage {
                operation: "select a start",
            });
        }
        if !position.in_bounds() {
            return Err(MazeError::OutOfBounds { position });
        }

        self.stage = BuilderStage::PickingEnd { start: position };
        Ok(())
    }

    /// Chooses the end cell. It must differ from the start.
    pub fn select_end(&mut self, position: Position) -> Result<(), MazeError> {
        let BuilderStage::PickingEnd { start } = self.stage else {
            return Err(MazeError::OutOfStage {
                operation: "select an end",
            });
        };
        if !position.in_bounds() {
            return Err(MazeError::OutOfBounds { position });
        }
        if position == start {
            debug!(%position, "end rejected: matches start");
            return Err(MazeError::EndMatchesStart);
        }

        self.stage = BuilderStage::PlacingWalls {
            start,
            end: position,
        };
        Ok(())
    }

    /// Adds the wall, or removes it if it is already placed.
    ///
    /// Returns whether the wall is present afterwards. An addition past the
    /// budget is rejected and leaves the walls untouched.
    pub fn toggle_wall(&mut self, wall: Wall) -> Result<bool, MazeError> {
        if !matches!(self.stage, BuilderStage::PlacingWalls { .. }) {
            return Err(MazeError::OutOfStage {
                operation: "toggle a wall",
            });
        }

        let present = self.walls.toggle(wall)?;
        debug!(?wall, present, remaining = self.remaining_walls(), "wall toggled");
        Ok(present)
    }

    /// Steps back one stage, clearing the endpoint picked in the stage left.
    ///
    /// Walls are kept. Returns `false` when already at the first stage.
    pub fn back(&mut self) -> bool {
        self.stage = match self.stage {
            BuilderStage::PickingStart => return false,
            BuilderStage::PickingEnd { .. } => BuilderStage::PickingStart,
            BuilderStage::PlacingWalls { start, .. } => BuilderStage::PickingEnd { start },
        };
        true
    }

    /// Live feedback: both endpoints are set and connected by the current walls.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self.stage {
            BuilderStage::PlacingWalls { start, end } => is_connected(start, end, &self.walls),
            BuilderStage::PickingStart | BuilderStage::PickingEnd { .. } => false,
        }
    }

    /// Raw layout of the maze under construction, once both endpoints exist.
    #[must_use]
    pub fn layout(&self) -> Option<MazeLayout> {
        let BuilderStage::PlacingWalls { start, end } = self.stage else {
            return None;
        };
        Some(MazeLayout {
            start,
            end,
            walls: self.walls.to_walls(),
        })
    }

    /// Freezes the current design into a validated maze.
    pub fn submit(&self) -> Result<Maze, MazeError> {
        let BuilderStage::PlacingWalls { start, end } = self.stage else {
            return Err(MazeError::MissingEndpoints);
        };
        Maze::new(start, end, self.walls.clone())
    }

    /// Validates the design and wraps it into a submission for `player`.
    pub fn submit_command(&self, player: PlayerId) -> Result<Command, MazeError> {
        let maze = self.submit()?;
        Ok(Command::SubmitMaze {
            player,
            layout: maze.layout(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_duel_core::Direction;

    #[test]
    fn stages_advance_in_order() {
        let mut builder = MazeBuilder::new();
        assert_eq!(
            builder.select_end(Position::new(1, 1)),
            Err(MazeError::OutOfStage {
                operation: "select an end",
            })
        );

        builder.select_start(Position::new(0, 0)).expect("start");
        assert_eq!(builder.start(), Some(Position::new(0, 0)));
        assert!(builder.end().is_none());

        builder.select_end(Position::new(7, 7)).expect("end");
        assert_eq!(
            builder.stage(),
            BuilderStage::PlacingWalls {
                start: Position::new(0, 0),
                end: Position::new(7, 7),
            }
        );
    }

    #[test]
    fn walls_cannot_be_placed_before_endpoints() {
        let mut builder = MazeBuilder::new();
        let wall = Wall::new(Position::new(3, 3), Direction::Up);
        assert!(matches!(
            builder.toggle_wall(wall),
            Err(MazeError::OutOfStage { .. })
        ));
        assert!(builder.walls().is_empty());
    }

    #[test]
    fn off_board_start_is_rejected() {
        let mut builder = MazeBuilder::new();
        let position = Position::new(-1, 0);
        assert_eq!(
            builder.select_start(position),
            Err(MazeError::OutOfBounds { position })
        );
        assert_eq!(builder.stage(), BuilderStage::PickingStart);
    }
}
