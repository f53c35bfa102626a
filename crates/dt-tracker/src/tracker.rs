//! The duty session state machine.
//!
//! Host events arrive one at a time. The tracker owns at most one current
//! (unfinalized) session and decides, per event, whether to create, refine,
//! finalize or discard it. Finalized sessions go to the shared
//! [`SessionStore`]; an interrupted session goes to the [`Journal`] on logout
//! and is recovered on the next place change.

use std::sync::Arc;

use dt_core::roster::{self, PARTY_LOGGING_DISABLED, SOLO};
use dt_core::{DutySession, DutySettings, NameResolver, RouletteId, TerritoryId};
use dt_store::{Journal, SessionStore};

use crate::event::HostEvent;
use crate::host::Host;
use crate::options::TrackerOptions;
use crate::TrackerError;

/// Substituted when a home world cannot be resolved.
const UNKNOWN_WORLD: &str = "Unknown";

/// Where the tracker stands between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No current session.
    Idle,
    /// A queue popped; waiting for the place the duty happens in.
    Pending,
    /// A session is attached to a place and not yet finalized.
    Active,
    /// A journaled session waits to be matched against the next named place.
    Recovering,
}

/// Result of the roster step during finalize.
enum RosterStep {
    Keep,
    DiscardSolo,
}

/// Turns host events into stored duty sessions.
pub struct DutyTracker<H, R> {
    host: H,
    resolver: R,
    options: TrackerOptions,
    store: Arc<SessionStore>,
    journal: Journal,
    current: Option<DutySession>,
}

impl<H: Host, R: NameResolver> DutyTracker<H, R> {
    pub fn new(
        host: H,
        resolver: R,
        options: TrackerOptions,
        store: Arc<SessionStore>,
        journal: Journal,
    ) -> Self {
        Self {
            host,
            resolver,
            options,
            store,
            journal,
            current: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        if self.journal.is_dirty() {
            return TrackerState::Recovering;
        }
        match &self.current {
            None => TrackerState::Idle,
            Some(session) if session.is_pending() => TrackerState::Pending,
            Some(_) => TrackerState::Active,
        }
    }

    /// The in-progress session, if any.
    pub const fn current(&self) -> Option<&DutySession> {
        self.current.as_ref()
    }

    /// Drops the in-progress session without storing it.
    pub fn discard_current(&mut self) -> Option<DutySession> {
        let discarded = self.current.take();
        if let Some(session) = &discarded {
            tracing::info!(territory_id = session.territory_id, "current session discarded");
        }
        discarded
    }

    pub const fn options(&self) -> &TrackerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TrackerOptions) {
        self.options = options;
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub const fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Dispatches one host event.
    pub fn handle(&mut self, event: &HostEvent) -> Result<(), TrackerError> {
        tracing::trace!(event = event.name(), state = ?self.state(), "handling host event");
        match *event {
            HostEvent::QueuePopped {
                roulette_id,
                settings,
            } => self.on_queue_popped(roulette_id, settings),
            HostEvent::PlaceChanged { territory_id } => self.on_place_changed(territory_id)?,
            HostEvent::ActivityStarted { territory_id } => self.on_activity_started(territory_id),
            HostEvent::ActivityCompleted { territory_id } => {
                self.on_activity_completed(territory_id)?;
            }
            HostEvent::Logout => self.on_logout()?,
        }
        Ok(())
    }

    // ========== Events ==========

    /// A queue pop supersedes whatever was undecided before it.
    pub fn on_queue_popped(&mut self, roulette_id: RouletteId, settings: DutySettings) {
        if !self.options.enable_logging {
            return;
        }
        if let Some(previous) = self.current.take() {
            tracing::debug!(
                territory_id = previous.territory_id,
                roulette_id = previous.roulette_id,
                "queue pop discards current session"
            );
        }
        if roulette_id == 0 && !self.options.track_non_roulette_pops {
            return;
        }

        let mut session = DutySession::new(0, roulette_id, self.host.now());
        session.settings = settings;
        tracing::debug!(roulette_id, %settings, "pending session created");
        self.current = Some(session);
    }

    pub fn on_place_changed(&mut self, territory_id: TerritoryId) -> Result<(), TrackerError> {
        if !self.options.enable_logging || self.host.is_recorder_playback() {
            return Ok(());
        }
        let place_name = self.resolver.territory_name(territory_id);

        if self.journal.is_dirty() {
            self.recover(territory_id, &place_name);
            return Ok(());
        }

        let Some((current_territory, is_roulette)) = self
            .current
            .as_ref()
            .map(|s| (s.territory_id, s.is_roulette()))
        else {
            if !place_name.is_empty() && !self.options.only_duty_roulette {
                self.current = Some(DutySession::new(territory_id, 0, self.host.now()));
                tracing::debug!(territory_id, place = %place_name, "session started on entry");
            }
            return Ok(());
        };

        if current_territory == 0 {
            if !is_roulette && place_name.is_empty() {
                self.discard("queue abandoned before entering a duty");
            } else if !is_roulette && self.options.only_duty_roulette {
                self.discard("only roulettes are recorded");
            } else if let Some(session) = self.current.as_mut() {
                session.territory_id = territory_id;
                session.begin_at = self.host.now();
                tracing::debug!(territory_id, place = %place_name, "session attached to place");
            }
        } else if current_territory == territory_id {
            // Re-entering the same instance, e.g. after a brief disconnect.
        } else if self.options.keep_incomplete_entries {
            tracing::debug!(
                from = current_territory,
                to = territory_id,
                "left duty early, storing incomplete session"
            );
            self.finalize()?;
        } else {
            self.discard("left duty early");
        }
        Ok(())
    }

    /// Refines timing and captures the job and roster at the real start.
    pub fn on_activity_started(&mut self, territory_id: TerritoryId) {
        if !self.options.enable_logging || territory_id == 0 {
            return;
        }
        let Some(session) = self
            .current
            .as_mut()
            .filter(|s| s.territory_id == territory_id)
        else {
            return;
        };

        session.begin_at = self.host.now();
        capture_job(&self.host, session);
        if self.options.log_party
            && let Some(members) = live_roster(&self.host, &self.resolver, &self.options)
            && roster::is_recordable_party(members.len())
        {
            roster::merge_members(&mut session.party_members, members);
        }
        tracing::debug!(territory_id, "duty started");
    }

    pub fn on_activity_completed(&mut self, territory_id: TerritoryId) -> Result<(), TrackerError> {
        if !self.options.enable_logging {
            return Ok(());
        }
        let Some(session) = self.current.as_mut() else {
            return Ok(());
        };
        if session.territory_id != territory_id {
            tracing::debug!(
                expected = session.territory_id,
                territory_id,
                "completion reported for a different territory"
            );
        }
        session.is_completed = true;
        self.finalize()
    }

    /// Journals an unfinished session so it can be picked up after relogging.
    /// The current session itself stays in place.
    pub fn on_logout(&mut self) -> Result<(), TrackerError> {
        if let Some(session) = &self.current
            && !session.is_completed
            && !session.is_pending()
        {
            self.journal.save_in_progress(session)?;
            tracing::info!(territory_id = session.territory_id, "journaled session on logout");
        }
        Ok(())
    }

    // ========== Transitions ==========

    fn discard(&mut self, reason: &'static str) {
        if let Some(session) = self.current.take() {
            tracing::debug!(territory_id = session.territory_id, reason, "session discarded");
        }
    }

    /// One-shot recovery on the first named place: the journal expires there
    /// whether or not it matches. Unnamed places leave it waiting.
    fn recover(&mut self, territory_id: TerritoryId, place_name: &str) {
        if place_name.is_empty() {
            tracing::debug!(territory_id, "unnamed place, journal kept for recovery");
            return;
        }
        match self.journal.load_in_progress() {
            Some(entry) if entry.territory_id == territory_id => {
                tracing::info!(territory_id, "recovered journaled session");
                self.current = Some(entry);
            }
            Some(entry) => {
                tracing::info!(
                    journaled = entry.territory_id,
                    territory_id,
                    "journaled session does not match, dropping it"
                );
            }
            None => {}
        }
        self.journal.clear();
    }

    /// Completes the current session's remaining fields and stores it.
    ///
    /// Shared by natural completion and forced finalization when leaving early.
    fn finalize(&mut self) -> Result<(), TrackerError> {
        let Some(mut session) = self.current.take() else {
            return Ok(());
        };
        if session.is_pending() {
            tracing::warn!("dropping session that never reached a territory");
            return Ok(());
        }

        session.end_at = Some(self.host.now());
        capture_job(&self.host, &mut session);
        if let RosterStep::DiscardSolo = self.finalize_roster(&mut session) {
            tracing::debug!(territory_id = session.territory_id, "solo session not recorded");
            return Ok(());
        }

        if let Err(err) = self.store.insert(session.clone()) {
            self.current = Some(session);
            return Err(err.into());
        }
        tracing::info!(
            territory_id = session.territory_id,
            roulette_id = session.roulette_id,
            completed = session.is_completed,
            "session recorded"
        );
        Ok(())
    }

    fn finalize_roster(&self, session: &mut DutySession) -> RosterStep {
        if !self.options.log_party {
            roster::merge_members(&mut session.party_members, [PARTY_LOGGING_DISABLED]);
            return RosterStep::Keep;
        }
        let Some(members) = live_roster(&self.host, &self.resolver, &self.options) else {
            return RosterStep::Keep;
        };
        if members.is_empty() {
            if !self.options.record_solo {
                return RosterStep::DiscardSolo;
            }
            roster::merge_members(&mut session.party_members, [SOLO]);
        } else if roster::is_recordable_party(members.len()) {
            roster::merge_members(&mut session.party_members, members);
        }
        RosterStep::Keep
    }
}

/// Records the local character's job, if the host can tell.
fn capture_job<H: Host>(host: &H, session: &mut DutySession) {
    match host.local_player() {
        Some(player) => session.player_job_abbr = player.job_abbr,
        None => tracing::debug!("local player unavailable, job not captured"),
    }
}

/// Formats the live party as roster tokens. `None` if the host has no list.
fn live_roster<H: Host, R: NameResolver>(
    host: &H,
    resolver: &R,
    options: &TrackerOptions,
) -> Option<Vec<String>> {
    let Some(members) = host.party_members() else {
        tracing::debug!("party list unavailable, roster not captured");
        return None;
    };
    Some(
        members
            .iter()
            .map(|member| {
                let world = resolver.world_name(member.home_world);
                let world = if world.is_empty() { UNKNOWN_WORLD } else { world.as_str() };
                let job = member
                    .job_abbr
                    .as_deref()
                    .filter(|_| options.log_party_jobs);
                roster::member_token(&member.name, world, job)
            })
            .collect(),
    )
}
