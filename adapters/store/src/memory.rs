//! In-process store keeping each match as a JSON document.

use std::{
    collections::BTreeMap,
    sync::{
        mpsc::{channel, Receiver, Sender},
        Arc, Mutex, MutexGuard,
    },
};

use maze_duel_core::MatchId;
use maze_duel_world::{query, MatchState};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{Revision, SharedStore, StoreError, Versioned};

#[derive(Debug)]
struct Document {
    revision: Revision,
    body: Value,
}

#[derive(Debug, Default)]
struct Inner {
    documents: BTreeMap<MatchId, Document>,
    subscribers: BTreeMap<MatchId, Vec<Sender<Versioned<MatchState>>>>,
}

impl Inner {
    fn current_revision(&self, match_id: &MatchId) -> Option<Revision> {
        self.documents.get(match_id).map(|document| document.revision)
    }

    fn store(&mut self, state: &MatchState) -> Result<Revision, StoreError> {
        let match_id = query::match_id(state).clone();
        let body = serde_json::to_value(state).map_err(|source| StoreError::Corrupt {
            match_id: match_id.clone(),
            source,
        })?;
        let revision = self
            .current_revision(&match_id)
            .map_or(Revision::FIRST, Revision::next);
        let _ = self
            .documents
            .insert(match_id.clone(), Document { revision, body });

        self.notify(&match_id, revision, state);
        Ok(revision)
    }

    fn notify(&mut self, match_id: &MatchId, revision: Revision, state: &MatchState) {
        let Some(senders) = self.subscribers.get_mut(match_id) else {
            return;
        };

        let before = senders.len();
        senders.retain(|sender| {
            sender
                .send(Versioned {
                    revision,
                    value: state.clone(),
                })
                .is_ok()
        });
        let pruned = before - senders.len();
        if pruned > 0 {
            debug!(%match_id, pruned, "dropped closed subscribers");
        }
        if senders.is_empty() {
            let _ = self.subscribers.remove(match_id);
        }
    }
}

/// Thread-safe in-memory [`SharedStore`].
///
/// Clones share the same underlying documents, so two clients holding clones
/// observe each other's writes.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Unavailable)
    }

    /// Number of live subscriptions to a match.
    pub fn subscriber_count(&self, match_id: &MatchId) -> Result<usize, StoreError> {
        Ok(self.lock()?.subscribers.get(match_id).map_or(0, Vec::len))
    }
}

impl SharedStore for MemoryStore {
    fn read(&self, match_id: &MatchId) -> Result<Option<Versioned<MatchState>>, StoreError> {
        let inner = self.lock()?;
        let Some(document) = inner.documents.get(match_id) else {
            return Ok(None);
        };

        let value = serde_json::from_value(document.body.clone()).map_err(|source| {
            StoreError::Corrupt {
                match_id: match_id.clone(),
                source,
            }
        })?;
        Ok(Some(Versioned {
            revision: document.revision,
            value,
        }))
    }

    fn write(&self, state: &MatchState) -> Result<Revision, StoreError> {
        self.lock()?.store(state)
    }

    fn write_if(
        &self,
        state: &MatchState,
        expected: Option<Revision>,
    ) -> Result<Revision, StoreError> {
        let mut inner = self.lock()?;
        let match_id = query::match_id(state);
        let actual = inner.current_revision(match_id);
        if actual != expected {
            warn!(%match_id, ?expected, ?actual, "conditional write rejected");
            return Err(StoreError::Conflict {
                match_id: match_id.clone(),
                expected,
                actual,
            });
        }

        inner.store(state)
    }

    fn subscribe(&self, match_id: &MatchId) -> Result<Receiver<Versioned<MatchState>>, StoreError> {
        let (sender, receiver) = channel();
        self.lock()?
            .subscribers
            .entry(match_id.clone())
            .or_default()
            .push(sender);
        Ok(receiver)
    }
}
