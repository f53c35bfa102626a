//! A duty interrupted by logout is resumed by a fresh tracker after restart.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use dt_core::{DutySettings, NameCatalog};
use dt_store::{Journal, SessionStore};
use dt_tracker::{DutyTracker, Host, HostEvent, LocalPlayer, PartyMember, TrackerOptions, TrackerState};

struct StaticHost {
    now: DateTime<Utc>,
    party: Vec<PartyMember>,
}

impl Host for StaticHost {
    fn local_player(&self) -> Option<LocalPlayer> {
        Some(LocalPlayer {
            job_abbr: "PLD".to_string(),
        })
    }

    fn party_members(&self) -> Option<Vec<PartyMember>> {
        Some(self.party.clone())
    }

    fn is_recorder_playback(&self) -> bool {
        false
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

fn catalog() -> NameCatalog {
    let mut catalog = NameCatalog::default();
    catalog.territories.insert(1036, "Sastasha".to_string());
    catalog.territories.insert(1037, "The Tam-Tara Deepcroft".to_string());
    catalog.worlds.insert(40, "Jenova".to_string());
    catalog
}

fn party() -> Vec<PartyMember> {
    ["Minfilia Warde", "Tataru Taru"]
        .into_iter()
        .map(|name| PartyMember {
            name: name.to_string(),
            home_world: 40,
            job_abbr: None,
        })
        .collect()
}

fn tracker_at(
    dir: &std::path::Path,
    now: DateTime<Utc>,
) -> DutyTracker<StaticHost, NameCatalog> {
    let store = Arc::new(SessionStore::open(dir).unwrap());
    DutyTracker::new(
        StaticHost { now, party: party() },
        catalog(),
        TrackerOptions::default(),
        store,
        Journal::open(dir),
    )
}

#[test]
fn interrupted_duty_is_recovered_and_completed() {
    let temp = tempfile::tempdir().unwrap();
    let begin = Utc.with_ymd_and_hms(2025, 3, 2, 18, 0, 0).unwrap();

    {
        let mut tracker = tracker_at(temp.path(), begin);
        tracker
            .handle(&HostEvent::QueuePopped {
                roulette_id: 3,
                settings: DutySettings::empty(),
            })
            .unwrap();
        tracker
            .handle(&HostEvent::PlaceChanged { territory_id: 1036 })
            .unwrap();
        tracker
            .handle(&HostEvent::ActivityStarted { territory_id: 1036 })
            .unwrap();
        tracker.handle(&HostEvent::Logout).unwrap();
        assert!(tracker.store().is_empty());
    }

    let resumed = Utc.with_ymd_and_hms(2025, 3, 2, 18, 12, 0).unwrap();
    let mut tracker = tracker_at(temp.path(), resumed);
    assert_eq!(tracker.state(), TrackerState::Recovering);

    tracker
        .handle(&HostEvent::PlaceChanged { territory_id: 1036 })
        .unwrap();
    assert_eq!(tracker.state(), TrackerState::Active);
    assert!(!tracker.journal().path().exists());

    tracker
        .handle(&HostEvent::ActivityCompleted { territory_id: 1036 })
        .unwrap();

    let stored = tracker.store().snapshot();
    assert_eq!(stored.len(), 1);
    let session = &stored[0];
    assert_eq!(session.roulette_id, 3);
    assert_eq!(session.begin_at, begin);
    assert_eq!(session.end_at, Some(resumed));
    assert!(session.is_completed);
    assert_eq!(session.player_job_abbr, "PLD");
    assert_eq!(
        session.party_members,
        vec!["Minfilia Warde @ Jenova", "Tataru Taru @ Jenova"]
    );

    // The stored list survives another restart.
    let reopened = SessionStore::open(temp.path()).unwrap();
    assert_eq!(reopened.snapshot(), stored);
}

#[test]
fn journal_expires_when_relogging_elsewhere() {
    let temp = tempfile::tempdir().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 3, 2, 18, 0, 0).unwrap();

    {
        let mut tracker = tracker_at(temp.path(), now);
        tracker
            .handle(&HostEvent::PlaceChanged { territory_id: 1036 })
            .unwrap();
        tracker.handle(&HostEvent::Logout).unwrap();
    }

    let mut tracker = tracker_at(temp.path(), now);
    // Unnamed places such as the lobby leave the journal waiting.
    tracker
        .handle(&HostEvent::PlaceChanged { territory_id: 129 })
        .unwrap();
    assert_eq!(tracker.state(), TrackerState::Recovering);
    assert!(tracker.journal().path().exists());

    tracker
        .handle(&HostEvent::PlaceChanged { territory_id: 1037 })
        .unwrap();
    assert_eq!(tracker.state(), TrackerState::Idle);
    assert!(!tracker.journal().path().exists());
    assert!(tracker.current().is_none());
    assert!(tracker.store().is_empty());
}

#[test]
fn journal_survives_loading_zone_before_reentry() {
    let temp = tempfile::tempdir().unwrap();
    let begin = Utc.with_ymd_and_hms(2025, 3, 2, 18, 0, 0).unwrap();

    {
        let mut tracker = tracker_at(temp.path(), begin);
        tracker
            .handle(&HostEvent::QueuePopped {
                roulette_id: 5,
                settings: DutySettings::empty(),
            })
            .unwrap();
        tracker
            .handle(&HostEvent::PlaceChanged { territory_id: 1036 })
            .unwrap();
        tracker.handle(&HostEvent::Logout).unwrap();
    }

    let mut tracker = tracker_at(temp.path(), begin);
    tracker
        .handle(&HostEvent::PlaceChanged { territory_id: 129 })
        .unwrap();
    tracker
        .handle(&HostEvent::PlaceChanged { territory_id: 1036 })
        .unwrap();

    let current = tracker.current().unwrap();
    assert_eq!(current.roulette_id, 5);
    assert_eq!(current.begin_at, begin);
    assert_eq!(tracker.state(), TrackerState::Active);
}
