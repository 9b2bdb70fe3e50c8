//! Error taxonomy shared by builders, the world and adapters.

use thiserror::Error;

use crate::{PlayerId, Position};

/// Broad error categories that UI layers branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The maze under construction breaks a rule; the author retries locally.
    Validation,
    /// The action is not allowed for this player right now.
    TurnViolation,
    /// Something the action depends on is missing from the match.
    NotFound,
    /// A concurrent write won the race against this action.
    ConcurrencyAnomaly,
}

/// Reasons a maze or a maze edit is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeError {
    /// The end was placed on the start cell.
    #[error("the end cannot share a cell with the start")]
    EndMatchesStart,
    /// A cell outside the board was referenced.
    #[error("cell {position} lies outside the board")]
    OutOfBounds {
        /// Offending cell.
        position: Position,
    },
    /// Adding the wall would exceed the placement budget.
    #[error("at most {limit} walls may be placed")]
    WallBudgetExceeded {
        /// Configured budget.
        limit: usize,
    },
    /// Submission was attempted before both endpoints were chosen.
    #[error("both a start and an end must be chosen")]
    MissingEndpoints,
    /// The walls disconnect the end from the start.
    #[error("no path exists from the start to the end")]
    NoPath,
    /// The builder is not in a stage that accepts the operation.
    #[error("cannot {operation} at this stage")]
    OutOfStage {
        /// Operation that was attempted.
        operation: &'static str,
    },
}

impl MazeError {
    /// Every maze error is a local validation failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Reasons the match state machine rejects a command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The mover does not hold the current turn.
    #[error("it is not {player}'s turn")]
    NotYourTurn {
        /// Player that attempted to act.
        player: PlayerId,
    },
    /// The command does not apply to the current phase.
    #[error("cannot {action} during the {phase} phase")]
    WrongPhase {
        /// Attempted action.
        action: &'static str,
        /// Phase the match is in.
        phase: &'static str,
    },
    /// The player already committed a maze this round.
    #[error("{player} already submitted a maze this round")]
    MazeAlreadySubmitted {
        /// Author of the existing maze.
        player: PlayerId,
    },
    /// The player is not part of the match.
    #[error("player {player} is not part of this match")]
    UnknownPlayer {
        /// Unknown player.
        player: PlayerId,
    },
    /// A maze required by the command is absent.
    #[error("no maze from {owner} is on record")]
    MissingMaze {
        /// Player whose maze is missing.
        owner: PlayerId,
    },
    /// The command needs a second player who has not joined.
    #[error("the match has no opponent yet")]
    MissingOpponent,
    /// Two players are already seated.
    #[error("the match already has two players")]
    MatchFull,
    /// The submitted maze failed validation.
    #[error("invalid maze: {0}")]
    InvalidMaze(#[from] MazeError),
}

impl MatchError {
    /// Category of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotYourTurn { .. } | Self::WrongPhase { .. } | Self::MazeAlreadySubmitted { .. } => {
                ErrorKind::TurnViolation
            }
            Self::UnknownPlayer { .. } | Self::MissingMaze { .. } | Self::MissingOpponent => {
                ErrorKind::NotFound
            }
            Self::MatchFull | Self::InvalidMaze(_) => ErrorKind::Validation,
        }
    }
}
