#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Move resolution for blind traversal of an opponent's maze.
//!
//! The mover never sees the maze. A move either enters the adjacent cell or
//! bumps into a wall or the board edge; either way the attempt is spent.

use maze_duel_core::{Direction, MazeView, MoveOutcome, Obstruction, Position, Wall, WallId};
use tracing::debug;

/// Resolves a single step from `current` toward `direction` inside `maze`.
#[must_use]
pub fn resolve_move<M>(current: Position, direction: Direction, maze: &M) -> MoveOutcome
where
    M: MazeView + ?Sized,
{
    let target = current.neighbor(direction);

    let obstruction = if !target.in_bounds() {
        Some(Obstruction::Boundary)
    } else if maze.walls().blocks(current, target) {
        Some(Obstruction::Wall)
    } else {
        None
    };

    match obstruction {
        Some(obstruction) => {
            debug!(?current, ?direction, ?obstruction, "move blocked");
            MoveOutcome::Blocked {
                at: current,
                direction,
                obstruction,
            }
        }
        None => MoveOutcome::Advanced {
            from: current,
            to: target,
            reached_end: target == maze.end(),
        },
    }
}

/// Solo traversal of a single maze using the blind-bump rules.
///
/// Practice runs have no turns and no opponent; they only count attempts and
/// remember the walls the runner has bumped into.
#[derive(Clone, Debug)]
pub struct PracticeRun<M> {
    maze: M,
    position: Position,
    moves: u32,
    discovered: Vec<WallId>,
    finished: bool,
}

impl<M: MazeView> PracticeRun<M> {
    /// Starts a run at the maze start.
    #[must_use]
    pub fn new(maze: M) -> Self {
        let position = maze.start();
        Self {
            maze,
            position,
            moves: 0,
            discovered: Vec::new(),
            finished: false,
        }
    }

    /// Attempts one step. Returns `None` once the end has been reached.
    pub fn step(&mut self, direction: Direction) -> Option<MoveOutcome> {
        if self.finished {
            return None;
        }

        let outcome = resolve_move(self.position, direction, &self.maze);
        self.moves = self.moves.saturating_add(1);
        self.position = outcome.new_position();

        if outcome.is_blocked() {
            let id = Wall::new(self.position, direction).canonical_id();
            if !self.discovered.contains(&id) {
                self.discovered.push(id);
            }
        }

        if outcome.reached_end() {
            self.finished = true;
        }

        Some(outcome)
    }

    /// Returns to the start of the same maze, forgetting progress.
    pub fn restart(&mut self) {
        self.position = self.maze.start();
        self.moves = 0;
        self.discovered.clear();
        self.finished = false;
    }

    /// Current cell of the runner.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Attempts made so far, failed ones included.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Walls bumped into so far, in discovery order.
    #[must_use]
    pub fn discovered(&self) -> &[WallId] {
        &self.discovered
    }

    /// Reports whether the runner reached the end.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Maze being practised.
    #[must_use]
    pub const fn maze(&self) -> &M {
        &self.maze
    }
}
