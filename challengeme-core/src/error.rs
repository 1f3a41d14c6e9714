use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which table a uniqueness violation was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Language,
    Challenge,
    ChallengeSet,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Challenge => "challenge",
            Self::ChallengeSet => "challenge set",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be opened or connected to.
    #[error("cannot open challenge store at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// An existing, non-empty store does not have the expected schema.
    #[error("challenge store {} is corrupted", .path.display())]
    CorruptDatabase { path: PathBuf },

    #[error("{kind} {name:?} is already in the database")]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("challenge set {0} does not exist")]
    UnknownChallengeSet(i64),

    #[error("challenge {0} does not exist")]
    NotFound(i64),

    #[error("challenge {id} is already {state}")]
    InvalidState { id: i64, state: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// True for errors the store refuses to recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::CorruptDatabase { .. })
    }
}

/// Why the selector could not offer a (challenge, language) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoEligibleChallenge {
    #[error("there are no unstarted challenges left")]
    NoUnstartedChallenges,

    #[error("no languages have been added")]
    NoLanguages,

    #[error("every unstarted challenge is restricted to languages you have not added")]
    AllConstrained,
}
