//! Client session: every action re-reads the match before it is applied.

use std::sync::mpsc::Receiver;

use maze_duel_core::{
    Command, Direction, ErrorKind, Event, MatchError, MatchId, MazeLayout, PlayerId,
};
use maze_duel_world::{apply, query, MatchState};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{Revision, SharedStore, StoreError, Versioned};

/// How a client protects its writes against concurrent writers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnGuard {
    /// Commit with a conditional write against the revision that was read.
    #[default]
    Conditional,
    /// Check preconditions on a fresh read, then overwrite. A racing write
    /// may be silently discarded.
    Advisory,
}

/// Client session settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Write protection strategy.
    pub guard: TurnGuard,
}

/// Failures surfaced to a client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The rules refused the action.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// The store refused or failed the read or write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Broad category of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Match(error) => error.kind(),
            Self::Store(error) => error.kind(),
        }
    }
}

/// One player's connection to a shared match.
#[derive(Debug)]
pub struct MatchClient<S, R> {
    store: S,
    rng: R,
    config: ClientConfig,
    match_id: MatchId,
    player: PlayerId,
    view: Option<Versioned<MatchState>>,
}

impl<S, R> MatchClient<S, R>
where
    S: SharedStore,
    R: Rng,
{
    /// Opens a new match hosted by `player`.
    pub fn host(
        store: S,
        rng: R,
        config: ClientConfig,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<Self, ClientError> {
        let state = MatchState::new(match_id.clone(), player.clone());
        let revision = match config.guard {
            TurnGuard::Conditional => store.write_if(&state, None)?,
            TurnGuard::Advisory => store.write(&state)?,
        };
        debug!(%match_id, %player, %revision, "match hosted");

        Ok(Self {
            store,
            rng,
            config,
            match_id,
            player,
            view: Some(Versioned {
                revision,
                value: state,
            }),
        })
    }

    /// Joins an existing match, or reconnects to it with an existing identity.
    ///
    /// Reconnecting only reads the stored snapshot; a seated player never
    /// writes on re-attach.
    pub fn join(
        store: S,
        rng: R,
        config: ClientConfig,
        match_id: MatchId,
        player: PlayerId,
    ) -> Result<(Self, Vec<Event>), ClientError> {
        let mut client = Self {
            store,
            rng,
            config,
            match_id,
            player,
            view: None,
        };

        let fresh = client.fetch()?;
        if query::player(&fresh.value, &client.player).is_some() {
            debug!(
                match_id = %client.match_id,
                player = %client.player,
                revision = %fresh.revision,
                "player re-attached"
            );
            let events = vec![Event::PlayerReconnected {
                player: client.player.clone(),
            }];
            client.view = Some(fresh);
            return Ok((client, events));
        }

        let events = client.execute(Command::Join {
            player: client.player.clone(),
        })?;
        Ok((client, events))
    }

    /// Identity this client acts as.
    #[must_use]
    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Match this client is attached to.
    #[must_use]
    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    /// Last snapshot this client read or wrote. It may be stale.
    #[must_use]
    pub fn view(&self) -> Option<&Versioned<MatchState>> {
        self.view.as_ref()
    }

    /// Replaces the local view with the stored snapshot.
    pub fn sync(&mut self) -> Result<&Versioned<MatchState>, ClientError> {
        let fresh = self.fetch()?;
        Ok(self.view.insert(fresh))
    }

    /// Receives every snapshot written to this match from now on.
    pub fn subscribe(&self) -> Result<Receiver<Versioned<MatchState>>, ClientError> {
        Ok(self.store.subscribe(&self.match_id)?)
    }

    /// Commits this player's maze for the round.
    pub fn submit_maze(&mut self, layout: MazeLayout) -> Result<Vec<Event>, ClientError> {
        self.execute(Command::SubmitMaze {
            player: self.player.clone(),
            layout,
        })
    }

    /// Attempts one step through the opponent's maze.
    pub fn request_move(&mut self, direction: Direction) -> Result<Vec<Event>, ClientError> {
        self.execute(Command::Move {
            player: self.player.clone(),
            direction,
        })
    }

    /// Starts the next round once the current one has ended.
    pub fn rematch(&mut self) -> Result<Vec<Event>, ClientError> {
        self.execute(Command::Rematch {
            player: self.player.clone(),
        })
    }

    fn fetch(&self) -> Result<Versioned<MatchState>, ClientError> {
        self.store
            .read(&self.match_id)?
            .ok_or_else(|| {
                StoreError::MissingMatch {
                    match_id: self.match_id.clone(),
                }
                .into()
            })
    }

    fn commit(
        &self,
        state: &MatchState,
        expected: Revision,
    ) -> Result<Revision, ClientError> {
        let written = match self.config.guard {
            TurnGuard::Conditional => self.store.write_if(state, Some(expected)),
            TurnGuard::Advisory => self.store.write(state),
        };
        written.map_err(|error| {
            warn!(player = %self.player, %error, "write failed");
            error.into()
        })
    }

    fn execute(&mut self, command: Command) -> Result<Vec<Event>, ClientError> {
        let fresh = self.fetch()?;
        debug!(player = %command.player(), revision = %fresh.revision, "applying command");
        let mut events = Vec::new();
        let next = apply(&fresh.value, command, &mut self.rng, &mut events)?;
        let revision = self.commit(&next, fresh.revision)?;

        self.view = Some(Versioned {
            revision,
            value: next,
        });
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn hosting_twice_conflicts_under_conditional_guard() {
        let store = MemoryStore::new();
        let id = MatchId::new("m");
        let _host = MatchClient::host(
            store.clone(),
            ChaCha8Rng::seed_from_u64(0),
            ClientConfig::default(),
            id.clone(),
            PlayerId::new("alice"),
        )
        .expect("hosted");

        let error = MatchClient::host(
            store,
            ChaCha8Rng::seed_from_u64(0),
            ClientConfig::default(),
            id,
            PlayerId::new("bob"),
        )
        .expect_err("match already exists");
        assert_eq!(error.kind(), ErrorKind::ConcurrencyAnomaly);
    }

    #[test]
    fn joining_an_unknown_match_is_not_found() {
        let result = MatchClient::join(
            MemoryStore::new(),
            ChaCha8Rng::seed_from_u64(0),
            ClientConfig::default(),
            MatchId::new("ghost"),
            PlayerId::new("bob"),
        );
        let error = result.map(|_| ()).expect_err("nothing to join");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
