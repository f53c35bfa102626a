//! Replay command: drives the tracker from a recorded host script.
//!
//! A script is JSON lines. Each line is either a host event
//! (`{"type":"place_changed","territory_id":1036}`) or a directive that
//! updates what the scripted host reports:
//!
//! - `{"type":"clock","at":"2025-01-01T20:00:00Z"}` sets the clock
//! - `{"type":"advance","seconds":90}` moves it forward
//! - `{"type":"player","job_abbr":"WHM"}` sets the local player (`null` hides it)
//! - `{"type":"party","members":[...]}` sets the party list (`null` hides it)
//! - `{"type":"playback","active":true}` toggles recorder playback
//! - `{"type":"discard_current"}` drops the in-progress session
//! - `{"type":"logging","enabled":false}` toggles session logging
//!
//! The journal lives in the data directory, so a `logout` in one replay is
//! recovered by the next.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Args;
use serde::Deserialize;

use dt_store::Journal;
use dt_tracker::{DutyTracker, Host, HostEvent, LocalPlayer, PartyMember, TrackerState};

use crate::Config;
use crate::commands::util::{load_names, open_store, territory_label};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Script file to replay, or `-` for stdin.
    pub script: PathBuf,
}

/// Host whose state is set by script directives.
#[derive(Debug)]
pub struct ScriptedHost {
    clock: Cell<DateTime<Utc>>,
    player: Option<LocalPlayer>,
    party: Option<Vec<PartyMember>>,
    playback: bool,
}

impl ScriptedHost {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            clock: Cell::new(start),
            player: None,
            party: Some(Vec::new()),
            playback: false,
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Clock { at } => self.clock.set(at),
            Directive::Advance { seconds } => {
                self.clock.set(self.clock.get() + TimeDelta::seconds(seconds));
            }
            Directive::Player { job_abbr } => {
                self.player = job_abbr.map(|job_abbr| LocalPlayer { job_abbr });
            }
            Directive::Party { members } => self.party = members,
            Directive::Playback { active } => self.playback = active,
            Directive::DiscardCurrent | Directive::Logging { .. } => {}
        }
    }
}

impl Host for ScriptedHost {
    fn local_player(&self) -> Option<LocalPlayer> {
        self.player.clone()
    }

    fn party_members(&self) -> Option<Vec<PartyMember>> {
        self.party.clone()
    }

    fn is_recorder_playback(&self) -> bool {
        self.playback
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.get()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Directive {
    Clock { at: DateTime<Utc> },
    Advance { seconds: i64 },
    Player { job_abbr: Option<String> },
    Party { members: Option<Vec<PartyMember>> },
    Playback { active: bool },
    DiscardCurrent,
    Logging { enabled: bool },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptLine {
    Event(HostEvent),
    Directive(Directive),
}

/// Counts reported after a replay.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub recorded: usize,
}

fn parse_script<R: BufRead>(reader: R) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: ScriptLine = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid script entry on line {}", idx + 1))?;
        lines.push(parsed);
    }
    Ok(lines)
}

pub fn run<W: Write>(writer: &mut W, args: &ReplayArgs, config: &Config) -> Result<ReplaySummary> {
    let script = if args.script.as_os_str() == "-" {
        parse_script(io::stdin().lock())?
    } else {
        let file = File::open(&args.script)
            .with_context(|| format!("failed to open {}", args.script.display()))?;
        parse_script(BufReader::new(file))?
    };
    replay(writer, script, config, Utc::now())
}

fn replay<W: Write>(
    writer: &mut W,
    script: Vec<ScriptLine>,
    config: &Config,
    start: DateTime<Utc>,
) -> Result<ReplaySummary> {
    let store = Arc::new(open_store(config)?);
    let journal = Journal::open(&config.data_dir);
    let names = load_names(config);
    let before = store.len();
    let mut tracker = DutyTracker::new(
        ScriptedHost::new(start),
        &names,
        config.tracking.clone(),
        Arc::clone(&store),
        journal,
    );

    let mut summary = ReplaySummary::default();
    for line in script {
        match line {
            ScriptLine::Event(event) => {
                tracker
                    .handle(&event)
                    .with_context(|| format!("failed to handle {} event", event.name()))?;
                summary.events += 1;
            }
            ScriptLine::Directive(Directive::DiscardCurrent) => {
                tracker.discard_current();
            }
            ScriptLine::Directive(Directive::Logging { enabled }) => {
                let mut options = tracker.options().clone();
                options.enable_logging = enabled;
                tracker.set_options(options);
            }
            ScriptLine::Directive(directive) => tracker.host_mut().apply(directive),
        }
    }
    summary.recorded = store.len().saturating_sub(before);

    writeln!(writer, "Replayed {} events", summary.events)?;
    writeln!(writer, "Recorded {} sessions", summary.recorded)?;
    match (tracker.state(), tracker.current()) {
        (TrackerState::Recovering, _) => {
            writeln!(writer, "Journaled session awaits recovery")?;
        }
        (TrackerState::Active, Some(session)) => writeln!(
            writer,
            "Unfinished session at {} was not recorded",
            territory_label(&names, session.territory_id)
        )?,
        (TrackerState::Pending, _) => writeln!(writer, "Queue pop was never entered")?,
        _ => {}
    }

    if let Some(threshold) = config.archive.threshold
        && let Some(path) = store
            .archive(threshold, config.archive.keep)
            .context("failed to archive sessions")?
    {
        writeln!(writer, "Archived to {}", path.display())?;
    }

    Ok(summary)
}
