#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Duel engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative match state, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! happened. Geometry and the canonical wall model live here as well because
//! every other crate reasons about cells and walls in the same terms.

use serde::{Deserialize, Serialize};

mod error;
mod walls;

pub use error::{ErrorKind, MatchError, MazeError};
pub use walls::{count_distinct, Wall, WallId, WallSet};

/// Number of rows and columns on every maze board.
pub const BOARD_SIZE: i32 = 8;

/// Maximum number of distinct walls a single maze may contain.
pub const MAX_WALLS: usize = 15;

/// Cardinal movement directions available to players and walls.
///
/// Variants are declared in the fixed visitation order used by searches.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in search order: up, down, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Row and column offsets applied when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Location of a single board cell expressed as row and column indices.
///
/// Ordering compares rows first and columns second, which is the ordering used
/// to pick the canonical side of a shared wall.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Cell adjacent to this one in the provided direction.
    ///
    /// Does not clamp to the board; only saturates at the integer limits.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (rows, cols) = direction.offset();
        Self {
            row: self.row.saturating_add(rows),
            col: self.col.saturating_add(cols),
        }
    }

    /// Reports whether the position lies on the board.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.row >= 0 && self.row < BOARD_SIZE && self.col >= 0 && self.col < BOARD_SIZE
    }

    /// Direction leading from this cell to an orthogonally adjacent one.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.neighbor(*direction) == other)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Opaque player identifier supplied by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps a pre-validated identity token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the underlying token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key under which a match is stored in the shared state store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Wraps a store key.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the underlying key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unvalidated maze description exchanged between builders, the store and
/// the world. The world turns it into a validated `Maze` on submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    /// Cell the traversing player starts from.
    pub start: Position,
    /// Cell the traversing player must reach.
    pub end: Position,
    /// Raw walls as recorded by the author. Duplicates are tolerated.
    pub walls: Vec<Wall>,
}

/// Read access to a maze's ground truth, implemented by validated mazes.
pub trait MazeView {
    /// Cell the traversing player starts from.
    fn start(&self) -> Position;
    /// Cell the traversing player must reach.
    fn end(&self) -> Position;
    /// Walls of the maze.
    fn walls(&self) -> &WallSet;
}

/// Why a move attempt failed to change the mover's position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Obstruction {
    /// The move would leave the board.
    Boundary,
    /// A wall of the traversed maze separates the two cells.
    Wall,
}

/// Result of resolving a single move attempt against a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// The mover entered the adjacent cell.
    Advanced {
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
        /// Whether `to` is the end of the traversed maze.
        reached_end: bool,
    },
    /// The mover bumped into a wall or the board edge and stayed put.
    Blocked {
        /// Cell the mover remains on.
        at: Position,
        /// Direction that was attempted.
        direction: Direction,
        /// What stopped the move.
        obstruction: Obstruction,
    },
}

impl MoveOutcome {
    /// Position of the mover after the attempt.
    #[must_use]
    pub const fn new_position(&self) -> Position {
        match self {
            Self::Advanced { to, .. } => *to,
            Self::Blocked { at, .. } => *at,
        }
    }

    /// Reports whether the move failed.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// Reports whether the move landed on the maze end.
    #[must_use]
    pub const fn reached_end(&self) -> bool {
        matches!(
            self,
            Self::Advanced {
                reached_end: true,
                ..
            }
        )
    }
}

/// Wall discovered by a failed move, shown to the mover for the rest of the round.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionWall {
    /// Cell the mover bumped from.
    pub position: Position,
    /// Direction the mover attempted.
    pub direction: Direction,
    /// Player whose move failed.
    pub discovered_by: PlayerId,
    /// Player who authored the maze being traversed.
    pub map_owner: PlayerId,
    /// Logical timestamp: index of the move within the round.
    pub timestamp: u64,
}

impl CollisionWall {
    /// Canonical identifier of the bumped wall.
    #[must_use]
    pub fn wall_id(&self) -> WallId {
        Wall::new(self.position, self.direction).canonical_id()
    }
}

/// Commands that express all permissible match mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Adds a player to the match, or re-attaches a returning one.
    Join {
        /// Player entering the match.
        player: PlayerId,
    },
    /// Commits a player's maze for the current round.
    SubmitMaze {
        /// Author of the maze.
        player: PlayerId,
        /// Maze to validate and freeze.
        layout: MazeLayout,
    },
    /// Attempts a single step through the opponent's maze.
    Move {
        /// Player attempting the move.
        player: PlayerId,
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Starts a fresh round after a finished one.
    Rematch {
        /// Player requesting the rematch.
        player: PlayerId,
    },
}

impl Command {
    /// Player issuing the command.
    #[must_use]
    pub fn player(&self) -> &PlayerId {
        match self {
            Self::Join { player }
            | Self::SubmitMaze { player, .. }
            | Self::Move { player, .. }
            | Self::Rematch { player } => player,
        }
    }
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new player entered the match.
    PlayerJoined {
        /// Player that joined.
        player: PlayerId,
    },
    /// A known player re-attached without losing progress.
    PlayerReconnected {
        /// Player that reconnected.
        player: PlayerId,
    },
    /// A maze was validated and frozen for the round.
    MazeSubmitted {
        /// Author of the maze.
        player: PlayerId,
    },
    /// Both mazes are in and traversal begins.
    PlayStarted {
        /// Player holding the first turn.
        first_turn: PlayerId,
    },
    /// A move attempt consumed a turn.
    MoveResolved {
        /// Player that moved.
        player: PlayerId,
        /// Result of the attempt.
        outcome: MoveOutcome,
    },
    /// A failed move revealed a wall for the first time.
    CollisionRecorded {
        /// Recorded collision.
        wall: CollisionWall,
    },
    /// The turn passed to the other player.
    TurnPassed {
        /// Player now holding the turn.
        next: PlayerId,
    },
    /// A player reached the end of the opponent's maze.
    MatchWon {
        /// Winning player.
        winner: PlayerId,
        /// Turns the winner consumed this round.
        moves: u32,
    },
    /// The match returned to setup for another round.
    RematchStarted {
        /// Round number that begins.
        round: u32,
        /// Player seeded to move first, if decided.
        first_turn: Option<PlayerId>,
    },
}
