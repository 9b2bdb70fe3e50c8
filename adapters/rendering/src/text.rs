//! Plain-text board rendering for terminals.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use maze_duel_core::{Direction, Position, Wall, WallId};

use crate::{board_cells, BoardScene, RenderingBackend, RunnerRole, Scene, WallVisibility};

const CLOSED_HORIZONTAL: &str = "---";
const FOUND_HORIZONTAL: &str = "###";
const OPEN_HORIZONTAL: &str = "   ";
const CLOSED_VERTICAL: char = '|';
const FOUND_VERTICAL: char = '#';
const OPEN_VERTICAL: char = ' ';

/// Draws a board as ASCII art, one line per grid line.
///
/// Placed walls use `-` and `|`, discovered walls use `#`. Cells show `@` for
/// the viewer, `O` for the opponent, `S` and `E` for the endpoints.
#[must_use]
pub fn render_board(board: &BoardScene) -> String {
    let walls = board.wall_lookup();
    let size = board_cells();
    let mut out = String::new();

    for row in 0..size {
        out.push('+');
        for col in 0..size {
            let cell = position(row, col);
            let segment = if row == 0 {
                CLOSED_HORIZONTAL
            } else {
                match walls.get(&id(cell, Direction::Up)) {
                    Some(WallVisibility::Placed) => CLOSED_HORIZONTAL,
                    Some(WallVisibility::Discovered) => FOUND_HORIZONTAL,
                    None => OPEN_HORIZONTAL,
                }
            };
            out.push_str(segment);
            out.push('+');
        }
        out.push('\n');

        for col in 0..size {
            let cell = position(row, col);
            let edge = if col == 0 {
                CLOSED_VERTICAL
            } else {
                match walls.get(&id(cell, Direction::Left)) {
                    Some(WallVisibility::Placed) => CLOSED_VERTICAL,
                    Some(WallVisibility::Discovered) => FOUND_VERTICAL,
                    None => OPEN_VERTICAL,
                }
            };
            out.push(edge);
            out.push(' ');
            out.push(glyph(board, cell));
            out.push(' ');
        }
        out.push(CLOSED_VERTICAL);
        out.push('\n');
    }

    out.push('+');
    for _ in 0..size {
        out.push_str(CLOSED_HORIZONTAL);
        out.push('+');
    }
    out.push('\n');
    out
}

fn position(row: usize, col: usize) -> Position {
    Position::new(row as i32, col as i32)
}

fn id(cell: Position, direction: Direction) -> WallId {
    Wall::new(cell, direction).canonical_id()
}

fn glyph(board: &BoardScene, cell: Position) -> char {
    let runner = |role| {
        board
            .runners
            .iter()
            .any(|runner| runner.position == cell && runner.role == role)
    };

    if runner(RunnerRole::Viewer) {
        '@'
    } else if runner(RunnerRole::Opponent) {
        'O'
    } else if board.start == Some(cell) {
        'S'
    } else if board.end == Some(cell) {
        'E'
    } else {
        '.'
    }
}

/// Backend writing scenes as text to any writer.
#[derive(Debug)]
pub struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes a single board with its caption.
    pub fn present_board(&mut self, board: &BoardScene) -> AnyResult<()> {
        writeln!(self.out, "{}", board.title).context("failed to write board title")?;
        write!(self.out, "{}", render_board(board)).context("failed to write board")?;
        self.out.flush().context("failed to flush output")
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        writeln!(self.out, "Round {}: {}", scene.round, scene.headline)
            .context("failed to write headline")?;
        for board in &scene.boards {
            self.present_board(board)?;
        }
        Ok(())
    }
}
