#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board scenes for Maze Duel adapters.
//!
//! Scenes are plain descriptors built from a match snapshot for one viewer.
//! The shared snapshot holds every wall of both mazes, so hiding the
//! opponent's walls during play happens here and nowhere else.

use std::{collections::BTreeMap, error::Error, fmt};

use anyhow::Result as AnyResult;
use maze_duel_core::{MazeView, PlayerId, Position, Wall, WallId, BOARD_SIZE};
use maze_duel_system_builder::MazeBuilder;
use maze_duel_system_movement::PracticeRun;
use maze_duel_world::{query, MatchState, Phase};

mod text;

pub use text::{render_board, TextBackend};

/// How a wall came to be shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WallVisibility {
    /// Known from the maze layout itself.
    Placed,
    /// Learned by bumping into it.
    Discovered,
}

/// Whose marker a runner is, relative to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerRole {
    /// The viewer.
    Viewer,
    /// The viewer's opponent.
    Opponent,
}

/// Wall drawn on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneWall {
    /// Canonical wall identifier.
    pub id: WallId,
    /// Source of the viewer's knowledge about the wall.
    pub visibility: WallVisibility,
}

/// Runner marker drawn on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneRunner {
    /// Cell the runner occupies.
    pub position: Position,
    /// Relation to the viewer.
    pub role: RunnerRole,
}

/// One 8x8 board as seen by a viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardScene {
    /// Caption shown above the board.
    pub title: String,
    /// Start cell, when known.
    pub start: Option<Position>,
    /// End cell, when known.
    pub end: Option<Position>,
    /// Walls the viewer is allowed to see.
    pub walls: Vec<SceneWall>,
    /// Runners inside this maze.
    pub runners: Vec<SceneRunner>,
}

impl BoardScene {
    /// Creates an empty board with the provided caption.
    #[must_use]
    pub fn new<T>(title: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            start: None,
            end: None,
            walls: Vec::new(),
            runners: Vec::new(),
        }
    }

    /// Adds a wall unless it is already shown with the same or stronger
    /// visibility.
    fn show_wall(&mut self, id: WallId, visibility: WallVisibility) {
        match self.walls.iter_mut().find(|wall| wall.id == id) {
            Some(existing) => existing.visibility = existing.visibility.min(visibility),
            None => self.walls.push(SceneWall { id, visibility }),
        }
    }

    /// Visibility of a wall on this board, if shown at all.
    #[must_use]
    pub fn wall_visibility(&self, wall: Wall) -> Option<WallVisibility> {
        let id = wall.canonical_id();
        self.walls
            .iter()
            .find(|shown| shown.id == id)
            .map(|shown| shown.visibility)
    }

    fn wall_lookup(&self) -> BTreeMap<WallId, WallVisibility> {
        self.walls
            .iter()
            .map(|wall| (wall.id, wall.visibility))
            .collect()
    }
}

/// Everything a viewer sees at one moment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Round number of the match.
    pub round: u32,
    /// One-line summary of the match status for the viewer.
    pub headline: String,
    /// Boards in display order: the viewer's maze first when present.
    pub boards: Vec<BoardScene>,
}

/// Output device for scenes.
pub trait RenderingBackend {
    /// Presents a single scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing scenes.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The viewer is not seated in the match.
    UnknownViewer {
        /// Identity that requested the scene.
        viewer: PlayerId,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownViewer { viewer } => {
                write!(f, "player {viewer} is not part of this match")
            }
        }
    }
}

impl Error for RenderingError {}

/// Builds the scene `viewer` is allowed to see.
///
/// The viewer's own maze is always fully visible, overlaid with the
/// opponent's position and bumps. The opponent's maze shows only its
/// endpoints, the viewer's position and the walls the viewer bumped into,
/// until the round ends and every wall is revealed.
pub fn match_scene(state: &MatchState, viewer: &PlayerId) -> Result<Scene, RenderingError> {
    let seat = query::player(state, viewer).ok_or_else(|| RenderingError::UnknownViewer {
        viewer: viewer.clone(),
    })?;
    let opponent = query::opponent_of(state, viewer);
    let phase = query::phase(state);
    let racing = !matches!(phase, Phase::Setup { .. });
    let revealed = matches!(phase, Phase::End { .. });

    let mut boards = Vec::new();

    if let Some(own) = query::maze_of(state, viewer) {
        let mut board = BoardScene::new("Your maze");
        board.start = Some(own.start());
        board.end = Some(own.end());
        for id in own.walls().iter() {
            board.show_wall(id, WallVisibility::Placed);
        }
        if let Some(opponent) = opponent {
            for wall in query::collisions_by(state, opponent, viewer) {
                board.show_wall(wall.wall_id(), WallVisibility::Discovered);
            }
            if let Some(rival) = query::player(state, opponent).filter(|_| racing) {
                board.runners.push(SceneRunner {
                    position: rival.position(),
                    role: RunnerRole::Opponent,
                });
            }
        }
        boards.push(board);
    }

    if let Some(opponent) = opponent.filter(|_| racing) {
        if let Some(theirs) = query::maze_of(state, opponent) {
            let mut board = BoardScene::new(format!("{opponent}'s maze"));
            board.start = Some(theirs.start());
            board.end = Some(theirs.end());
            for wall in query::collisions_by(state, viewer, opponent) {
                board.show_wall(wall.wall_id(), WallVisibility::Discovered);
            }
            if revealed {
                for id in theirs.walls().iter() {
                    board.show_wall(id, WallVisibility::Placed);
                }
            }
            board.runners.push(SceneRunner {
                position: seat.position(),
                role: RunnerRole::Viewer,
            });
            boards.push(board);
        }
    }

    Ok(Scene {
        round: query::round(state),
        headline: headline(state, viewer),
        boards,
    })
}

fn headline(state: &MatchState, viewer: &PlayerId) -> String {
    match query::phase(state) {
        Phase::Setup { .. } => {
            let ready = query::player(state, viewer).is_some_and(|seat| seat.is_ready());
            let seated = query::players(state).count();
            match (ready, seated) {
                (false, _) => "Build your maze".to_owned(),
                (true, 1) => "Waiting for an opponent to join".to_owned(),
                (true, _) => "Waiting for the opponent's maze".to_owned(),
            }
        }
        Phase::Play { current_turn } if current_turn == viewer => "Your turn".to_owned(),
        Phase::Play { current_turn } => format!("Waiting for {current_turn}"),
        Phase::End { winner } => {
            let moves = query::player(state, winner).map_or(0, |seat| seat.moves());
            if winner == viewer {
                format!("You reached the goal in {moves} moves")
            } else {
                format!("{winner} reached the goal in {moves} moves")
            }
        }
    }
}

/// Board for a maze under construction. Everything is visible to its author.
#[must_use]
pub fn builder_scene(builder: &MazeBuilder) -> BoardScene {
    let mut board = BoardScene::new(format!(
        "Building ({} walls left)",
        builder.remaining_walls()
    ));
    board.start = builder.start();
    board.end = builder.end();
    for id in builder.walls().iter() {
        board.show_wall(id, WallVisibility::Placed);
    }
    board
}

/// Board for a solo practice run: endpoints, runner and bumped walls.
#[must_use]
pub fn practice_scene<M: MazeView>(run: &PracticeRun<M>) -> BoardScene {
    let title = if run.is_finished() {
        format!("Practice: finished in {} moves", run.moves())
    } else {
        format!("Practice: {} moves", run.moves())
    };
    let mut board = BoardScene::new(title);
    board.start = Some(run.maze().start());
    board.end = Some(run.maze().end());
    for id in run.discovered() {
        board.show_wall(*id, WallVisibility::Discovered);
    }
    board.runners.push(SceneRunner {
        position: run.position(),
        role: RunnerRole::Viewer,
    });
    board
}

/// Number of cells along each side of a rendered board.
const fn board_cells() -> usize {
    BOARD_SIZE as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_duel_core::Direction;

    #[test]
    fn stronger_visibility_wins() {
        let mut board = BoardScene::new("test");
        let wall = Wall::new(Position::new(1, 1), Direction::Right);
        board.show_wall(wall.canonical_id(), WallVisibility::Discovered);
        board.show_wall(wall.canonical_id(), WallVisibility::Placed);

        assert_eq!(board.walls.len(), 1);
        assert_eq!(board.wall_visibility(wall), Some(WallVisibility::Placed));
    }

    #[test]
    fn builder_scene_shows_endpoints_and_walls() {
        let mut builder = MazeBuilder::new();
        builder.select_start(Position::new(0, 0)).expect("start");
        builder.select_end(Position::new(7, 7)).expect("end");
        let wall = Wall::new(Position::new(2, 2), Direction::Down);
        let _ = builder.toggle_wall(wall).expect("placed");

        let board = builder_scene(&builder);

        assert_eq!(board.start, Some(Position::new(0, 0)));
        assert_eq!(board.end, Some(Position::new(7, 7)));
        assert_eq!(board.wall_visibility(wall), Some(WallVisibility::Placed));
        assert_eq!(board.title, "Building (14 walls left)");
    }
}
