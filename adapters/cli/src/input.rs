//! Parsing of the line-oriented commands typed at the prompt.

use anyhow::{bail, Context, Result as AnyResult};
use maze_duel_core::{Direction, Position, Wall};

/// Edit requested while building a maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BuildStep {
    Start(Position),
    End(Position),
    Wall(Wall),
    Back,
    Load(String),
    Done,
}

pub(crate) const BUILD_HELP: &str = "commands: start <row> <col> | end <row> <col> | \
wall <row> <col> <up|down|left|right> | back | load <maze string> | done";

pub(crate) const MOVE_HELP: &str = "moves: up|down|left|right (or w/a/s/d)";

pub(crate) fn parse_build_step(line: &str) -> AnyResult<BuildStep> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        bail!("empty command; {BUILD_HELP}");
    };

    let step = match keyword.to_ascii_lowercase().as_str() {
        "start" => BuildStep::Start(parse_position(&mut words)?),
        "end" => BuildStep::End(parse_position(&mut words)?),
        "wall" => {
            let position = parse_position(&mut words)?;
            let direction = words
                .next()
                .context("missing wall side")
                .and_then(parse_direction)?;
            BuildStep::Wall(Wall::new(position, direction))
        }
        "back" => BuildStep::Back,
        "done" => BuildStep::Done,
        "load" => {
            let encoded = words.next().context("missing maze string")?;
            BuildStep::Load(encoded.to_owned())
        }
        other => bail!("unknown command '{other}'; {BUILD_HELP}"),
    };

    if words.next().is_some() {
        bail!("unexpected trailing input; {BUILD_HELP}");
    }
    Ok(step)
}

pub(crate) fn parse_direction(word: &str) -> AnyResult<Direction> {
    let direction = match word.trim().to_ascii_lowercase().as_str() {
        "up" | "w" => Direction::Up,
        "down" | "s" => Direction::Down,
        "left" | "a" => Direction::Left,
        "right" | "d" => Direction::Right,
        other => bail!("unknown direction '{other}'; {MOVE_HELP}"),
    };
    Ok(direction)
}

fn parse_position<'a, I>(words: &mut I) -> AnyResult<Position>
where
    I: Iterator<Item = &'a str>,
{
    let row = words.next().context("missing row")?;
    let col = words.next().context("missing column")?;
    let row = row
        .parse::<i32>()
        .with_context(|| format!("row '{row}' is not a number"))?;
    let col = col
        .parse::<i32>()
        .with_context(|| format!("column '{col}' is not a number"))?;
    Ok(Position::new(row, col))
}
