//! The duty session record and its structural equality.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::DutySettings;
use crate::types::{RouletteId, TerritoryId, ValidationError};

/// Schema version written with every session.
pub const SCHEMA_VERSION: u32 = 2;

/// One tracked occurrence of entering (and possibly clearing) an instanced duty.
///
/// Field names on disk match the store files written by earlier releases, so
/// existing data loads unchanged. `Settings` was added in a later revision and
/// defaults to empty when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DutySession {
    /// Schema marker. Not part of equality.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Place of the duty; `0` until the session is attached to one.
    pub territory_id: TerritoryId,
    /// Queue roulette; `0` for a direct entry.
    pub roulette_id: RouletteId,
    pub is_completed: bool,
    pub begin_at: DateTime<Utc>,
    /// `None` until the session is finalized.
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub player_job_abbr: String,
    #[serde(default)]
    pub party_members: Vec<String>,
    #[serde(default)]
    pub settings: DutySettings,
}

const fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl DutySession {
    /// Creates an unfinished session that began at `begin_at`.
    pub fn new(territory_id: TerritoryId, roulette_id: RouletteId, begin_at: DateTime<Utc>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            territory_id,
            roulette_id,
            is_completed: false,
            begin_at,
            end_at: None,
            player_job_abbr: String::new(),
            party_members: Vec::new(),
            settings: DutySettings::empty(),
        }
    }

    /// Returns `true` while the session is waiting for its place.
    pub const fn is_pending(&self) -> bool {
        self.territory_id == 0
    }

    /// Returns `true` if the session was joined through a roulette.
    pub const fn is_roulette(&self) -> bool {
        self.roulette_id != 0
    }

    /// Elapsed time between begin and end, if the session has ended.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end_at.map(|end| end - self.begin_at)
    }

    /// Checks the invariants a session must hold before it is persisted.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.territory_id == 0 {
            return Err(ValidationError::UnassignedTerritory);
        }
        Ok(())
    }

    /// Key under which structurally equal sessions collide.
    ///
    /// Party members are folded to lowercase; everything else is compared
    /// exactly.
    pub fn dedup_key(&self) -> SessionKey {
        SessionKey {
            territory_id: self.territory_id,
            roulette_id: self.roulette_id,
            is_completed: self.is_completed,
            begin_at: self.begin_at,
            end_at: self.end_at,
            player_job_abbr: self.player_job_abbr.clone(),
            party_members: self.party_members.iter().map(|m| m.to_lowercase()).collect(),
            settings: self.settings,
        }
    }
}

/// Structural equality: every field except `version`, with party members
/// compared in order but without regard to case.
impl PartialEq for DutySession {
    fn eq(&self, other: &Self) -> bool {
        self.territory_id == other.territory_id
            && self.roulette_id == other.roulette_id
            && self.is_completed == other.is_completed
            && self.begin_at == other.begin_at
            && self.end_at == other.end_at
            && self.player_job_abbr == other.player_job_abbr
            && self.settings == other.settings
            && self.party_members.len() == other.party_members.len()
            && self
                .party_members
                .iter()
                .zip(&other.party_members)
                .all(|(a, b)| a.to_lowercase() == b.to_lowercase())
    }
}

impl Eq for DutySession {}

/// Hashable projection of a [`DutySession`] consistent with its equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    territory_id: TerritoryId,
    roulette_id: RouletteId,
    is_completed: bool,
    begin_at: DateTime<Utc>,
    end_at: Option<DateTime<Utc>>,
    player_job_abbr: String,
    party_members: Vec<String>,
    settings: DutySettings,
}

/// Removes structurally equal sessions in place, keeping first occurrences.
///
/// Returns the number of sessions removed.
pub fn dedup_sessions(sessions: &mut Vec<DutySession>) -> usize {
    let before = sessions.len();
    let mut seen = HashSet::with_capacity(before);
    sessions.retain(|session| seen.insert(session.dedup_key()));
    before - sessions.len()
}
