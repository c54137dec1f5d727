//! Error taxonomy for the save pipeline.
//!
//! The first failing step aborts all remaining steps; no compensating
//! rollback of already-durable steps is attempted. Every variant names the
//! step it came from so the caller can log and decide on retry.

use std::path::PathBuf;

use thiserror::Error;

use regatta_codec::{SchemaError, ValidationError};

/// A save failed. Which variant tells the caller exactly how far the
/// pipeline got before aborting.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The candidate snapshot was rejected by validation. No side effect
    /// occurred.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The rendered document failed schema verification. No durable write
    /// occurred.
    #[error("schema verification failed: {0}")]
    Schema(#[from] SchemaError),

    /// The history append failed. No file write, no cache update; the whole
    /// save is safe to retry.
    #[error("history append failed: {0}")]
    History(#[from] HistoryError),

    /// The config file write failed after a successful history append. The
    /// history now holds a revision not yet reflected in the served file;
    /// reconciled by the next successful save, never auto-repaired here.
    #[error("config file write failed: {0}")]
    Persist(#[from] PersistError),
}

/// The version-history backend rejected an append.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("revision JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The allocated revision slot already exists — a concurrent writer got
    /// there first.
    #[error("conflicting revision already present at {path}")]
    Conflict { path: PathBuf },

    #[error("no revision with sequence number {seq}")]
    NotFound { seq: u64 },
}

/// The canonical config file could not be written.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("config file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The partial-config cache could not be updated. Swallowed (logged) by the
/// save pipeline: cache state is always re-derivable from the durable stores.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("partial config cache lock is poisoned")]
    Poisoned,
}

/// Convenience constructor for [`HistoryError::Io`].
pub(crate) fn history_io(path: impl Into<PathBuf>, source: std::io::Error) -> HistoryError {
    HistoryError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`PersistError::Io`].
pub(crate) fn persist_io(path: impl Into<PathBuf>, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.into(),
        source,
    }
}
