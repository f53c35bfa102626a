//! Lifecycle events delivered by the host.

use serde::{Deserialize, Serialize};

use dt_core::{DutySettings, RouletteId, TerritoryId};

/// A host lifecycle event.
///
/// Serialized with a `type` tag so recorded event streams can be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The duty finder matched the queue. `roulette_id` is `0` for a direct entry.
    QueuePopped {
        #[serde(default)]
        roulette_id: RouletteId,
        #[serde(default)]
        settings: DutySettings,
    },
    /// The character entered a new territory.
    PlaceChanged { territory_id: TerritoryId },
    /// The duty's start signal fired.
    ActivityStarted { territory_id: TerritoryId },
    /// The duty was cleared.
    ActivityCompleted { territory_id: TerritoryId },
    /// The character logged out or disconnected.
    Logout,
}

impl HostEvent {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::QueuePopped { .. } => "queue_popped",
            Self::PlaceChanged { .. } => "place_changed",
            Self::ActivityStarted { .. } => "activity_started",
            Self::ActivityCompleted { .. } => "activity_completed",
            Self::Logout => "logout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_parse_from_tagged_json() {
        let pop: HostEvent =
            serde_json::from_str(r#"{"type":"queue_popped","roulette_id":5,"settings":4}"#).unwrap();
        assert_eq!(
            pop,
            HostEvent::QueuePopped {
                roulette_id: 5,
                settings: DutySettings::LEVEL_SYNC,
            }
        );

        let direct: HostEvent = serde_json::from_str(r#"{"type":"queue_popped"}"#).unwrap();
        assert_eq!(
            direct,
            HostEvent::QueuePopped {
                roulette_id: 0,
                settings: DutySettings::empty(),
            }
        );

        let logout: HostEvent = serde_json::from_str(r#"{"type":"logout"}"#).unwrap();
        assert_eq!(logout.name(), "logout");
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let result: Result<HostEvent, _> = serde_json::from_str(r#"{"type":"teleport"}"#);
        assert!(result.is_err());
    }
}
