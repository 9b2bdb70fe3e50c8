#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Maze Duel.
//!
//! The match is a plain value. [`apply`] takes a snapshot and a command and
//! returns the next snapshot, so the same code runs on both clients and the
//! shared store only ever sees whole, internally consistent states.

use std::collections::BTreeMap;

use maze_duel_core::{
    CollisionWall, Command, Direction, Event, MatchError, MatchId, MazeLayout, MazeView,
    PlayerId, Position,
};
use maze_duel_system_movement::resolve_move;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

mod maze;

pub use maze::Maze;

/// Cell every player occupies before the first round starts.
const LOBBY_POSITION: Position = Position::new(0, 0);

/// Number of players a match seats.
const SEATS: usize = 2;

/// Lifecycle phase of a match together with the data only that phase carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Phase {
    /// Players are building mazes.
    Setup {
        /// Player seeded to move first once play starts, if already decided.
        first_turn: Option<PlayerId>,
    },
    /// Players alternate moves through each other's mazes.
    Play {
        /// Player allowed to move next.
        current_turn: PlayerId,
    },
    /// A player reached the end of the opponent's maze.
    End {
        /// Player that won the round.
        winner: PlayerId,
    },
}

impl Phase {
    /// Lowercase name of the phase.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Setup { .. } => "setup",
            Self::Play { .. } => "play",
            Self::End { .. } => "end",
        }
    }
}

/// Per-player state that survives reconnects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    position: Position,
    is_ready: bool,
    moves: u32,
    last_position: Option<Position>,
}

impl Player {
    fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: LOBBY_POSITION,
            is_ready: false,
            moves: 0,
            last_position: None,
        }
    }

    /// Identity of the player.
    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// Cell the player occupies inside the opponent's maze.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether the player's maze for this round is committed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// Turns consumed by the player this round.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Where the player stood when the previous round ended.
    #[must_use]
    pub const fn last_position(&self) -> Option<Position> {
        self.last_position
    }
}

/// Complete shared state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    id: MatchId,
    round: u32,
    phase: Phase,
    players: BTreeMap<PlayerId, Player>,
    mazes: BTreeMap<PlayerId, Maze>,
    collision_walls: Vec<CollisionWall>,
    clock: u64,
}

impl MatchState {
    /// Opens a match hosted by `host`, waiting for an opponent.
    #[must_use]
    pub fn new(id: MatchId, host: PlayerId) -> Self {
        let mut players = BTreeMap::new();
        let _ = players.insert(host.clone(), Player::new(host));
        Self {
            id,
            round: 1,
            phase: Phase::Setup { first_turn: None },
            players,
            mazes: BTreeMap::new(),
            collision_walls: Vec::new(),
            clock: 0,
        }
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, MatchError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| MatchError::UnknownPlayer { player: id.clone() })
    }

    fn opponent_of(&self, id: &PlayerId) -> Option<PlayerId> {
        self.players.keys().find(|other| *other != id).cloned()
    }

    fn join(&mut self, player: PlayerId, out_events: &mut Vec<Event>) -> Result<(), MatchError> {
        if self.players.contains_key(&player) {
            debug!(%player, "player re-attached");
            out_events.push(Event::PlayerReconnected { player });
            return Ok(());
        }

        if self.players.len() >= SEATS {
            return Err(MatchError::MatchFull);
        }

        info!(match_id = %self.id, %player, "player joined");
        let _ = self.players.insert(player.clone(), Player::new(player.clone()));
        out_events.push(Event::PlayerJoined { player });
        Ok(())
    }

    fn submit_maze<R>(
        &mut self,
        player: PlayerId,
        layout: &MazeLayout,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), MatchError>
    where
        R: Rng + ?Sized,
    {
        if !matches!(self.phase, Phase::Setup { .. }) {
            return Err(MatchError::WrongPhase {
                action: "submit a maze",
                phase: self.phase.name(),
            });
        }

        if self.mazes.contains_key(&player) {
            return Err(MatchError::MazeAlreadySubmitted { player });
        }

        let maze = Maze::from_layout(layout)?;
        self.player_mut(&player)?.is_ready = true;
        let _ = self.mazes.insert(player.clone(), maze);
        info!(match_id = %self.id, %player, "maze submitted");
        out_events.push(Event::MazeSubmitted { player });

        self.try_start_play(rng, out_events);
        Ok(())
    }

    fn try_start_play<R>(&mut self, rng: &mut R, out_events: &mut Vec<Event>)
    where
        R: Rng + ?Sized,
    {
        if self.players.len() != SEATS {
            return;
        }

        let all_ready = self
            .players
            .values()
            .all(|player| player.is_ready && self.mazes.contains_key(&player.id));
        if !all_ready {
            return;
        }

        let Phase::Setup { first_turn } = &self.phase else {
            return;
        };
        let seeded = first_turn
            .as_ref()
            .filter(|id| self.players.contains_key(*id))
            .cloned();
        let ids: Vec<PlayerId> = self.players.keys().cloned().collect();
        let Some(first) = seeded.or_else(|| ids.choose(rng).cloned()) else {
            return;
        };

        let mut starts = Vec::with_capacity(SEATS);
        for id in &ids {
            let Some(opponent) = self.opponent_of(id) else {
                return;
            };
            let Some(maze) = self.mazes.get(&opponent) else {
                return;
            };
            starts.push((id.clone(), maze.start()));
        }

        for (id, start) in starts {
            if let Some(player) = self.players.get_mut(&id) {
                player.position = start;
                player.moves = 0;
            }
        }

        self.clock = 0;
        self.phase = Phase::Play {
            current_turn: first.clone(),
        };
        info!(match_id = %self.id, first_turn = %first, round = self.round, "play started");
        out_events.push(Event::PlayStarted { first_turn: first });
    }

    fn move_player(
        &mut self,
        player: PlayerId,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), MatchError> {
        let Phase::Play { current_turn } = &self.phase else {
            return Err(MatchError::WrongPhase {
                action: "move",
                phase: self.phase.name(),
            });
        };

        let Some(from) = self.players.get(&player).map(Player::position) else {
            return Err(MatchError::UnknownPlayer { player });
        };

        if *current_turn != player {
            return Err(MatchError::NotYourTurn { player });
        }

        let opponent = self
            .opponent_of(&player)
            .ok_or(MatchError::MissingOpponent)?;
        let maze = self
            .mazes
            .get(&opponent)
            .ok_or_else(|| MatchError::MissingMaze {
                owner: opponent.clone(),
            })?;
        let outcome = resolve_move(from, direction, maze);

        let mover = self.player_mut(&player)?;
        mover.position = outcome.new_position();
        mover.moves = mover.moves.saturating_add(1);
        let moves = mover.moves;
        self.clock = self.clock.saturating_add(1);

        debug!(%player, ?direction, ?outcome, "move resolved");
        out_events.push(Event::MoveResolved {
            player: player.clone(),
            outcome,
        });

        if outcome.is_blocked() {
            self.record_collision(
                CollisionWall {
                    position: from,
                    direction,
                    discovered_by: player.clone(),
                    map_owner: opponent.clone(),
                    timestamp: self.clock,
                },
                out_events,
            );
        }

        if outcome.reached_end() {
            info!(match_id = %self.id, winner = %player, moves, "match won");
            self.phase = Phase::End {
                winner: player.clone(),
            };
            out_events.push(Event::MatchWon {
                winner: player,
                moves,
            });
        } else {
            self.phase = Phase::Play {
                current_turn: opponent.clone(),
            };
            out_events.push(Event::TurnPassed { next: opponent });
        }

        Ok(())
    }

    fn record_collision(&mut self, wall: CollisionWall, out_events: &mut Vec<Event>) {
        let id = wall.wall_id();
        let known = self.collision_walls.iter().any(|existing| {
            existing.discovered_by == wall.discovered_by
                && existing.map_owner == wall.map_owner
                && existing.wall_id() == id
        });
        if known {
            return;
        }

        self.collision_walls.push(wall.clone());
        out_events.push(Event::CollisionRecorded { wall });
    }

    fn rematch(&mut self, player: PlayerId, out_events: &mut Vec<Event>) -> Result<(), MatchError> {
        let Phase::End { winner } = &self.phase else {
            return Err(MatchError::WrongPhase {
                action: "start a rematch",
                phase: self.phase.name(),
            });
        };

        if !self.players.contains_key(&player) {
            return Err(MatchError::UnknownPlayer { player });
        }

        let loser = self.opponent_of(winner);

        self.mazes.clear();
        self.collision_walls.clear();
        for seat in self.players.values_mut() {
            seat.last_position = Some(seat.position);
            seat.is_ready = false;
            seat.moves = 0;
        }
        self.round = self.round.saturating_add(1);
        self.clock = 0;
        self.phase = Phase::Setup {
            first_turn: loser.clone(),
        };

        info!(match_id = %self.id, requested_by = %player, round = self.round, "rematch started");
        out_events.push(Event::RematchStarted {
            round: self.round,
            first_turn: loser,
        });
        Ok(())
    }
}

/// Applies the provided command to a match snapshot.
///
/// On success the next snapshot is returned and the resulting events are
/// appended to `out_events`. On failure nothing is emitted and the caller's
/// snapshot is untouched.
pub fn apply<R>(
    state: &MatchState,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> Result<MatchState, MatchError>
where
    R: Rng + ?Sized,
{
    let mut next = state.clone();
    let mut events = Vec::new();

    let result = match command {
        Command::Join { player } => next.join(player, &mut events),
        Command::SubmitMaze { player, layout } => {
            next.submit_maze(player, &layout, rng, &mut events)
        }
        Command::Move { player, direction } => next.move_player(player, direction, &mut events),
        Command::Rematch { player } => next.rematch(player, &mut events),
    };

    if let Err(error) = result {
        debug!(match_id = %state.id, %error, "command rejected");
        return Err(error);
    }

    out_events.append(&mut events);
    Ok(next)
}

/// Query functions that provide read-only access to the match state.
pub mod query {
    use maze_duel_core::{CollisionWall, MatchId, PlayerId};

    use super::{Maze, MatchState, Phase, Player};

    /// Store key of the match.
    #[must_use]
    pub fn match_id(state: &MatchState) -> &MatchId {
        &state.id
    }

    /// Round number, starting at one and incremented by each rematch.
    #[must_use]
    pub fn round(state: &MatchState) -> u32 {
        state.round
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(state: &MatchState) -> &Phase {
        &state.phase
    }

    /// Player allowed to move, during play only.
    #[must_use]
    pub fn current_turn(state: &MatchState) -> Option<&PlayerId> {
        match &state.phase {
            Phase::Play { current_turn } => Some(current_turn),
            Phase::Setup { .. } | Phase::End { .. } => None,
        }
    }

    /// Winner of the round, once it has ended.
    #[must_use]
    pub fn winner(state: &MatchState) -> Option<&PlayerId> {
        match &state.phase {
            Phase::End { winner } => Some(winner),
            Phase::Setup { .. } | Phase::Play { .. } => None,
        }
    }

    /// Reports whether `player` may move right now.
    #[must_use]
    pub fn is_turn_of(state: &MatchState, player: &PlayerId) -> bool {
        current_turn(state) == Some(player)
    }

    /// Seated players in identifier order.
    pub fn players(state: &MatchState) -> impl Iterator<Item = &Player> {
        state.players.values()
    }

    /// Looks up a seated player.
    #[must_use]
    pub fn player<'state>(state: &'state MatchState, id: &PlayerId) -> Option<&'state Player> {
        state.players.get(id)
    }

    /// The other seated player, if one has joined.
    #[must_use]
    pub fn opponent_of<'state>(
        state: &'state MatchState,
        id: &PlayerId,
    ) -> Option<&'state PlayerId> {
        state.players.keys().find(|other| *other != id)
    }

    /// Maze authored by `owner` this round.
    #[must_use]
    pub fn maze_of<'state>(state: &'state MatchState, owner: &PlayerId) -> Option<&'state Maze> {
        state.mazes.get(owner)
    }

    /// Every collision recorded this round, in discovery order.
    #[must_use]
    pub fn collision_walls(state: &MatchState) -> &[CollisionWall] {
        &state.collision_walls
    }

    /// Collisions `discoverer` made while traversing `map_owner`'s maze.
    pub fn collisions_by<'state>(
        state: &'state MatchState,
        discoverer: &'state PlayerId,
        map_owner: &'state PlayerId,
    ) -> impl Iterator<Item = &'state CollisionWall> + 'state {
        state
            .collision_walls
            .iter()
            .filter(move |wall| &wall.discovered_by == discoverer && &wall.map_owner == map_owner)
    }
}
