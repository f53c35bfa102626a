//! What the tracker needs to ask the host environment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dt_core::WorldId;

/// The character the host is playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPlayer {
    /// Job abbreviation, e.g. `WHM`.
    pub job_abbr: String,
}

/// One entry of the live party list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMember {
    pub name: String,
    pub home_world: WorldId,
    #[serde(default)]
    pub job_abbr: Option<String>,
}

/// Live state provided by the host.
///
/// Lookups may fail transiently (e.g. during a zone transition). A `None`
/// result only skips the step that needed it.
pub trait Host {
    /// The local character, if currently available.
    fn local_player(&self) -> Option<LocalPlayer>;

    /// The live party list (`0..=8` members, more for alliances), if available.
    fn party_members(&self) -> Option<Vec<PartyMember>>;

    /// `true` while the host replays a recorded duty, which must not be logged.
    fn is_recorder_playback(&self) -> bool;

    /// Current time.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
