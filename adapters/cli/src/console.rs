//! Interactive flows driven over any line-based input and output.

use std::{
    fmt,
    io::{BufRead, Write},
    sync::mpsc::Receiver,
};

use anyhow::{bail, Context, Result as AnyResult};
use maze_duel_core::{Event, MatchId, MoveOutcome, Obstruction, PlayerId};
use maze_duel_rendering::{
    builder_scene, match_scene, practice_scene, BoardScene, RenderingBackend, Scene, TextBackend,
};
use maze_duel_store::{ClientConfig, MatchClient, MemoryStore, SharedStore, Versioned};
use maze_duel_system_builder::MazeBuilder;
use maze_duel_system_movement::PracticeRun;
use maze_duel_world::{query, MatchState, Maze};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{
    input::{parse_build_step, parse_direction, BuildStep, BUILD_HELP, MOVE_HELP},
    maze_transfer,
};

/// Settings of a hot-seat duel.
#[derive(Clone, Debug)]
pub(crate) struct DuelOptions {
    pub(crate) host: PlayerId,
    pub(crate) guest: PlayerId,
    pub(crate) seed: Option<u64>,
    pub(crate) config: ClientConfig,
}

pub(crate) struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub(crate) const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, label: &str) -> AnyResult<Option<String>> {
        write!(self.output, "{label}> ").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    pub(crate) fn say(&mut self, message: impl fmt::Display) -> AnyResult<()> {
        writeln!(self.output, "{message}").context("failed to write output")
    }

    pub(crate) fn show_board(&mut self, board: &BoardScene) -> AnyResult<()> {
        TextBackend::new(&mut self.output).present_board(board)
    }

    fn show_scene(&mut self, scene: &Scene) -> AnyResult<()> {
        TextBackend::new(&mut self.output).present(scene)
    }

    /// Walks `author` through building a maze until a valid one is submitted.
    pub(crate) fn build_maze(&mut self, author: &str) -> AnyResult<Maze> {
        let mut builder = MazeBuilder::new();
        self.say(format_args!("{author}, build your maze. {BUILD_HELP}"))?;

        loop {
            self.show_board(&builder_scene(&builder))?;
            let Some(line) = self.prompt(author)? else {
                bail!("input closed while building a maze");
            };
            let step = match parse_build_step(&line) {
                Ok(step) => step,
                Err(error) => {
                    self.say(error)?;
                    continue;
                }
            };

            let outcome = match step {
                BuildStep::Start(position) => builder.select_start(position),
                BuildStep::End(position) => builder.select_end(position),
                BuildStep::Wall(wall) => builder.toggle_wall(wall).map(|_| ()),
                BuildStep::Back => {
                    if !builder.back() {
                        self.say("already at the first step")?;
                    }
                    Ok(())
                }
                BuildStep::Load(encoded) => match maze_transfer::decode(&encoded) {
                    Ok(layout) => MazeBuilder::load(&layout).map(|loaded| builder = loaded),
                    Err(error) => {
                        self.say(format_args!("rejected: {error}"))?;
                        continue;
                    }
                },
                BuildStep::Done => match builder.submit() {
                    Ok(maze) => return Ok(maze),
                    Err(error) => Err(error),
                },
            };

            if let Err(error) = outcome {
                self.say(format_args!("rejected: {error}"))?;
            } else if builder.end().is_some() && !builder.is_valid() {
                self.say("warning: the end is not reachable from the start")?;
            }
        }
    }

    /// Plays rounds between two players sharing this console.
    pub(crate) fn duel(&mut self, options: DuelOptions) -> AnyResult<()> {
        let store = MemoryStore::new();
        let match_id = MatchId::new("hot-seat");
        let updates = store.subscribe(&match_id)?;

        let mut host = MatchClient::host(
            store.clone(),
            seeded(options.seed, 0),
            options.config,
            match_id.clone(),
            options.host,
        )?;
        let (mut guest, _) = MatchClient::join(
            store,
            seeded(options.seed, 1),
            options.config,
            match_id,
            options.guest,
        )?;

        loop {
            for client in [&mut host, &mut guest] {
                let author = client.player().to_string();
                let maze = self.build_maze(&author)?;
                let events = client.submit_maze(maze.layout())?;
                self.narrate(&events)?;
            }

            self.play(&mut host, &mut guest)?;
            log_updates(&updates);

            let Some(answer) = self.prompt("rematch? (y/n)")? else {
                return Ok(());
            };
            if !answer.eq_ignore_ascii_case("y") {
                return Ok(());
            }
            let events = host.rematch()?;
            self.narrate(&events)?;
        }
    }

    fn play<S, G>(
        &mut self,
        host: &mut MatchClient<S, G>,
        guest: &mut MatchClient<S, G>,
    ) -> AnyResult<()>
    where
        S: SharedStore,
        G: Rng,
    {
        self.say(MOVE_HELP)?;
        loop {
            let state: MatchState = host.sync()?.value.clone();
            if query::winner(&state).is_some() {
                for viewer in [host.player(), guest.player()] {
                    let scene = match_scene(&state, viewer)?;
                    self.show_scene(&scene)?;
                }
                return Ok(());
            }

            let Some(current) = query::current_turn(&state).cloned() else {
                bail!("match is not in play");
            };
            let mover = if &current == host.player() {
                &mut *host
            } else {
                &mut *guest
            };

            let scene = match_scene(&state, &current)?;
            self.show_scene(&scene)?;
            let Some(line) = self.prompt(current.as_str())? else {
                bail!("input closed during play");
            };
            let direction = match parse_direction(&line) {
                Ok(direction) => direction,
                Err(error) => {
                    self.say(error)?;
                    continue;
                }
            };

            match mover.request_move(direction) {
                Ok(events) => self.narrate(&events)?,
                Err(error) => self.say(format_args!("move rejected: {error}"))?,
            }
        }
    }

    fn narrate(&mut self, events: &[Event]) -> AnyResult<()> {
        for event in events {
            match event {
                Event::MoveResolved {
                    player,
                    outcome: MoveOutcome::Blocked { obstruction, .. },
                } => {
                    let what = match obstruction {
                        Obstruction::Wall => "a wall",
                        Obstruction::Boundary => "the edge of the board",
                    };
                    self.say(format_args!("{player} bumped into {what}"))?;
                }
                Event::MoveResolved {
                    player,
                    outcome: MoveOutcome::Advanced { to, .. },
                } => self.say(format_args!("{player} moved to {to}"))?,
                Event::PlayStarted { first_turn } => {
                    self.say(format_args!("Both mazes are in. {first_turn} moves first."))?;
                }
                Event::MatchWon { winner, moves } => {
                    self.say(format_args!("{winner} reached the goal in {moves} moves!"))?;
                }
                Event::RematchStarted { round, .. } => {
                    self.say(format_args!("Round {round} begins."))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Lets a single player walk a maze without an opponent.
    pub(crate) fn practice(&mut self, maze: Maze) -> AnyResult<()> {
        let mut run = PracticeRun::new(maze);
        self.say(format_args!("Practice run. {MOVE_HELP} | restart | quit"))?;

        loop {
            self.show_board(&practice_scene(&run))?;
            if run.is_finished() {
                info!(moves = run.moves(), "practice finished");
                return self.say(format_args!("Finished in {} moves", run.moves()));
            }

            let Some(line) = self.prompt("practice")? else {
                return Ok(());
            };
            match line.to_ascii_lowercase().as_str() {
                "quit" | "q" => return Ok(()),
                "restart" => {
                    run.restart();
                    continue;
                }
                _ => {}
            }

            match parse_direction(&line) {
                Ok(direction) => {
                    if run.step(direction).is_some_and(|outcome| outcome.is_blocked()) {
                        self.say("bump!")?;
                    }
                }
                Err(error) => self.say(error)?,
            }
        }
    }
}

fn seeded(seed: Option<u64>, stream: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(stream)),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn log_updates(updates: &Receiver<Versioned<MatchState>>) {
    for update in updates.try_iter() {
        debug!(
            revision = %update.revision,
            phase = query::phase(&update.value).name(),
            "store updated"
        );
    }
}
