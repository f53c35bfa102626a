//! Duty session tracking driven by host lifecycle events.
//!
//! The host reports queue pops, place changes, duty start and completion,
//! and logout. [`DutyTracker`] turns that stream into [`dt_core::DutySession`]
//! records in a [`dt_store::SessionStore`], using [`dt_store::Journal`] to
//! carry an unfinished session across a relog.

mod event;
mod host;
mod options;
mod tracker;

pub use event::HostEvent;
pub use host::{Host, LocalPlayer, PartyMember};
pub use options::TrackerOptions;
pub use tracker::{DutyTracker, TrackerState};

use dt_store::StoreError;
use thiserror::Error;

/// Tracker errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Persisting a finished or interrupted session failed.
    #[error("failed to persist session: {0}")]
    Store(#[from] StoreError),
}
