#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared match storage and the client session that talks to it.
//!
//! The store holds one snapshot per match and knows nothing about the rules.
//! Every snapshot written through [`MatchClient`] is produced by
//! [`maze_duel_world::apply`] against a fresh read, so the store only ever
//! sees whole, internally consistent states.

use std::{fmt, sync::mpsc::Receiver};

use maze_duel_core::{ErrorKind, MatchId};
use maze_duel_world::MatchState;
use thiserror::Error;

mod client;
mod memory;

pub use client::{ClientConfig, ClientError, MatchClient, TurnGuard};
pub use memory::MemoryStore;

/// Monotonic per-match write counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(u64);

impl Revision {
    /// Revision assigned to the first write of a match.
    pub const FIRST: Self = Self(1);

    /// Wraps a raw counter value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Revision following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Value tagged with the revision it was read at or written as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    /// Revision of the stored document.
    pub revision: Revision,
    /// Decoded document.
    pub value: T,
}

/// Failures raised by a [`SharedStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write lost a race against another writer.
    #[error("match {match_id} changed concurrently (expected {expected:?}, found {actual:?})")]
    Conflict {
        /// Match being written.
        match_id: MatchId,
        /// Revision the writer based its snapshot on.
        expected: Option<Revision>,
        /// Revision actually stored.
        actual: Option<Revision>,
    },
    /// The stored document no longer decodes into a valid match.
    #[error("match {match_id} is corrupt: {source}")]
    Corrupt {
        /// Match whose document failed to decode.
        match_id: MatchId,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// No match is stored under the key.
    #[error("match {match_id} does not exist")]
    MissingMatch {
        /// Requested key.
        match_id: MatchId,
    },
    /// The backing store cannot be reached.
    #[error("store unavailable")]
    Unavailable,
}

impl StoreError {
    /// Broad category of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Conflict { .. } | Self::Unavailable => ErrorKind::ConcurrencyAnomaly,
            Self::Corrupt { .. } => ErrorKind::Validation,
            Self::MissingMatch { .. } => ErrorKind::NotFound,
        }
    }
}

/// Key-value store of match snapshots shared by both clients.
///
/// Implementations must notify subscribers of every accepted write, in
/// revision order.
pub trait SharedStore {
    /// Reads the latest snapshot of a match, if one exists.
    fn read(&self, match_id: &MatchId) -> Result<Option<Versioned<MatchState>>, StoreError>;

    /// Stores a snapshot unconditionally. The last writer wins.
    fn write(&self, state: &MatchState) -> Result<Revision, StoreError>;

    /// Stores a snapshot only if the stored revision still equals `expected`.
    ///
    /// `None` means the match must not exist yet.
    fn write_if(
        &self,
        state: &MatchState,
        expected: Option<Revision>,
    ) -> Result<Revision, StoreError>;

    /// Receives every snapshot written after the call.
    fn subscribe(&self, match_id: &MatchId) -> Result<Receiver<Versioned<MatchState>>, StoreError>;
}

impl<S: SharedStore + ?Sized> SharedStore for &S {
    fn read(&self, match_id: &MatchId) -> Result<Option<Versioned<MatchState>>, StoreError> {
        (**self).read(match_id)
    }

    fn write(&self, state: &MatchState) -> Result<Revision, StoreError> {
        (**self).write(state)
    }

    fn write_if(
        &self,
        state: &MatchState,
        expected: Option<Revision>,
    ) -> Result<Revision, StoreError> {
        (**self).write_if(state, expected)
    }

    fn subscribe(&self, match_id: &MatchId) -> Result<Receiver<Versioned<MatchState>>, StoreError> {
        (**self).subscribe(match_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisions_count_upwards() {
        assert_eq!(Revision::FIRST.next(), Revision::new(2));
        assert!(Revision::FIRST < Revision::FIRST.next());
        assert_eq!(Revision::new(7).to_string(), "r7");
    }

    #[test]
    fn conflicts_are_concurrency_anomalies() {
        let error = StoreError::Conflict {
            match_id: MatchId::new("m"),
            expected: Some(Revision::FIRST),
            actual: Some(Revision::new(2)),
        };
        assert_eq!(error.kind(), ErrorKind::ConcurrencyAnomaly);
        assert_eq!(
            StoreError::MissingMatch {
                match_id: MatchId::new("m"),
            }
            .kind(),
            ErrorKind::NotFound
        );
    }
}
