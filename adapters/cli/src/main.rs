#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for Maze Duel: hot-seat duels, practice runs and
//! maze strings.

mod console;
mod input;
mod maze_transfer;

use std::io;

use anyhow::{Context, Result as AnyResult};
use clap::{Parser, Subcommand, ValueEnum};
use maze_duel_core::{Direction, MazeLayout, MazeView, PlayerId, Position, Wall};
use maze_duel_rendering::builder_scene;
use maze_duel_store::{ClientConfig, TurnGuard};
use maze_duel_system_builder::MazeBuilder;
use maze_duel_world::Maze;
use tracing::level_filters::LevelFilter;

use crate::console::{Console, DuelOptions};

/// Blind two-player maze duel on an 8x8 board.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Log verbosity written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Two players share this terminal, build mazes and race through them.
    Duel {
        /// Seed for the first-turn draw; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// How moves are protected against concurrent writers.
        #[arg(long, value_enum, default_value_t = GuardArg::Conditional)]
        guard: GuardArg,
        /// Name of the hosting player.
        #[arg(long, default_value = "alice")]
        host: String,
        /// Name of the joining player.
        #[arg(long, default_value = "bob")]
        guest: String,
    },
    /// Walk a maze alone, counting moves and bumps.
    Practice {
        /// Maze string to practise on; a built-in maze is used when omitted.
        maze: Option<String>,
    },
    /// Build a maze interactively and print its maze string.
    Build,
    /// Check a maze string and draw the maze.
    Validate {
        /// Maze string to check.
        maze: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GuardArg {
    /// Conditional writes; a racing move is reported as a conflict.
    Conditional,
    /// Last write wins; a racing move may be lost.
    Advisory,
}

impl From<GuardArg> for TurnGuard {
    fn from(guard: GuardArg) -> Self {
        match guard {
            GuardArg::Conditional => Self::Conditional,
            GuardArg::Advisory => Self::Advisory,
        }
    }
}

/// Entry point for the Maze Duel command-line interface.
fn main() -> AnyResult<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    match cli.mode {
        Mode::Duel {
            seed,
            guard,
            host,
            guest,
        } => console.duel(DuelOptions {
            host: PlayerId::new(host),
            guest: PlayerId::new(guest),
            seed,
            config: ClientConfig {
                guard: guard.into(),
            },
        }),
        Mode::Practice { maze } => {
            let layout = match maze {
                Some(encoded) => {
                    maze_transfer::decode(&encoded).context("invalid maze string")?
                }
                None => practice_layout(),
            };
            let maze = Maze::from_layout(&layout).context("maze cannot be practised")?;
            console.practice(maze)
        }
        Mode::Build => {
            let maze = console.build_maze("you")?;
            let encoded = maze_transfer::encode(&maze.layout()).context("failed to export maze")?;
            console.say(encoded)
        }
        Mode::Validate { maze } => {
            let layout = maze_transfer::decode(&maze).context("invalid maze string")?;
            let maze = Maze::from_layout(&layout).context("maze rejected")?;
            console.show_board(&builder_scene(
                &MazeBuilder::load(&maze.layout()).context("maze rejected")?,
            ))?;
            console.say(format_args!(
                "valid maze: {} to {}, {} walls, shortest route {} moves",
                maze.start(),
                maze.end(),
                maze.walls().len(),
                maze.solution().len().saturating_sub(1),
            ))
        }
    }
}

/// Built-in practice maze: two long barriers with a gap at alternating ends.
fn practice_layout() -> MazeLayout {
    let upper = (0..7).map(|col| Wall::new(Position::new(1, col), Direction::Down));
    let lower = (1..8).map(|col| Wall::new(Position::new(4, col), Direction::Down));
    MazeLayout {
        start: Position::new(0, 0),
        end: Position::new(7, 7),
        walls: upper.chain(lower).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_practice_maze_is_valid() {
        let maze = Maze::from_layout(&practice_layout()).expect("valid maze");
        assert_eq!(maze.walls().len(), 14);
        assert!(maze.solution().len() > 14, "barriers force a long route");
    }

    #[test]
    fn cli_parses_duel_flags() {
        let cli = Cli::try_parse_from([
            "maze-duel",
            "--log-level",
            "debug",
            "duel",
            "--seed",
            "7",
            "--guard",
            "advisory",
        ])
        .expect("valid flags");

        assert_eq!(cli.log_level, LevelFilter::DEBUG);
        match cli.mode {
            Mode::Duel { seed, guard, .. } => {
                assert_eq!(seed, Some(7));
                assert_eq!(TurnGuard::from(guard), TurnGuard::Advisory);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }
}
