//! Storage layer for the duty tracker.
//!
//! Provides persistence for finalized sessions, the single-slot recovery
//! journal, and the CSV exchange format.
//!
//! # Files
//!
//! All files live in one data directory:
//! - `data_v2.json`: the full session list, rewritten on every mutation
//! - `temp_v2.json`: the journal; its presence means a session was
//!   interrupted by a logout and may be recovered
//! - `export-*.csv` / `archive-*.csv`: tabular exports
//!
//! # Thread Safety
//!
//! [`SessionStore`] is `Send + Sync`. Every operation holds the store's one
//! mutex across its whole read-modify-persist span, so event-driven inserts
//! and user-initiated exports, imports or deletions never interleave. Share it
//! with `Arc<SessionStore>`.
//!
//! [`Journal`] has a single owner (the tracker) and needs no lock.

mod fs;
mod journal;
mod store;
pub mod tabular;

use std::path::PathBuf;

use thiserror::Error;

pub use journal::Journal;
pub use store::{ImportReport, SessionStore};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file could not be read or written.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Sessions could not be encoded as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The CSV file could not be read or written.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Attempted to persist a session without a territory.
    #[error("session has no territory assigned")]
    UnassignedTerritory,
    /// Export was requested with an empty store.
    #[error("no sessions to export")]
    NothingToExport,
    /// The import file does not exist.
    #[error("import file not found: {0}")]
    ImportFileMissing(PathBuf),
    /// The import file held no row that passed validation.
    #[error("no valid rows in {path} ({skipped} skipped)")]
    NoValidRows { path: PathBuf, skipped: usize },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// User-facing result of an export or import: a success flag and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
}

impl OpOutcome {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
