//! Recording policy switches.

use serde::{Deserialize, Serialize};

/// Policies applied by the tracker.
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent user setting"
)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerOptions {
    /// Master switch. When off, every event except logout is ignored.
    pub enable_logging: bool,
    /// Store sessions run without a party (roster recorded as `Solo`).
    pub record_solo: bool,
    /// Only record duties entered through a roulette.
    pub only_duty_roulette: bool,
    /// When leaving a duty early, store the session as incomplete instead of
    /// discarding it.
    pub keep_incomplete_entries: bool,
    /// Record party members' names and worlds.
    pub log_party: bool,
    /// Append each party member's job to their roster entry.
    pub log_party_jobs: bool,
    /// Start a pending session on non-roulette queue pops. When off, such a
    /// pop only discards the current session.
    pub track_non_roulette_pops: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            enable_logging: true,
            record_solo: false,
            only_duty_roulette: false,
            keep_incomplete_entries: true,
            log_party: true,
            log_party_jobs: false,
            track_non_roulette_pops: true,
        }
    }
}
