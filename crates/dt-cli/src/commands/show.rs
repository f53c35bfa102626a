//! Show command: one session in detail.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use dt_core::query::format_hms;
use dt_core::time::{format_end, format_timestamp};
use dt_core::{DutySession, NameResolver, content_type_label};

use crate::Config;
use crate::commands::util::{load_names, open_store, session_at, territory_label};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Session number as printed by `list`.
    pub index: usize,
}

pub fn run<W: Write>(writer: &mut W, args: &ShowArgs, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let names = load_names(config);
    let sessions = store.snapshot();
    let session = session_at(&sessions, args.index)?;
    write_details(writer, &names, session)
}

fn write_details<W: Write, R: NameResolver>(
    writer: &mut W,
    names: &R,
    session: &DutySession,
) -> Result<()> {
    writeln!(writer, "Territory: {}", territory_label(names, session.territory_id))?;
    writeln!(writer, "Queue: {}", content_type_label(names, session.roulette_id))?;
    writeln!(writer, "Completed: {}", if session.is_completed { "yes" } else { "no" })?;
    writeln!(writer, "Begin: {}", format_timestamp(session.begin_at))?;
    writeln!(writer, "End: {}", format_end(session.end_at))?;
    if let Some(duration) = session.duration() {
        writeln!(writer, "Duration: {}", format_hms(duration))?;
    }
    if !session.player_job_abbr.is_empty() {
        writeln!(writer, "Job: {}", session.player_job_abbr)?;
    }
    writeln!(writer, "Settings: {}", session.settings)?;

    if session.party_members.is_empty() {
        writeln!(writer, "Party: none recorded")?;
    } else {
        writeln!(writer, "Party:")?;
        for member in &session.party_members {
            writeln!(writer, "  - {member}")?;
        }
    }
    Ok(())
}
