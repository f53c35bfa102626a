//! List command for recorded sessions.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dt_core::query::{begins_within, format_hms, matches_text};
use dt_core::{DutySession, NameResolver};

use crate::Config;
use crate::commands::util::{load_names, open_store, parse_date, summary_line};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Earliest begin date (YYYY-MM-DD, `today`, `3 days ago`, ...).
    #[arg(long)]
    pub from: Option<String>,

    /// Latest begin date, inclusive.
    #[arg(long)]
    pub to: Option<String>,

    /// Only sessions whose place, queue, job or party matches this text.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListedSession<'a> {
    index: usize,
    #[serde(flatten)]
    session: &'a DutySession,
}

pub fn run<W: Write>(writer: &mut W, args: &ListArgs, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let names = load_names(config);
    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;
    let needle = args.search.as_deref().unwrap_or_default();

    let sessions = store.snapshot();
    // Positions are 1-based over the whole store so `show` and `remove` can use them.
    let listed: Vec<ListedSession<'_>> = sessions
        .iter()
        .enumerate()
        .filter(|(_, s)| begins_within(s, from, to) && matches_text(s, &names, needle))
        .map(|(i, session)| ListedSession {
            index: i + 1,
            session,
        })
        .collect();

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&listed)?)?;
        return Ok(());
    }
    write_table(writer, &names, &listed)
}

fn write_table<W: Write, R: NameResolver>(
    writer: &mut W,
    names: &R,
    listed: &[ListedSession<'_>],
) -> Result<()> {
    if listed.is_empty() {
        writeln!(writer, "No sessions recorded.")?;
        return Ok(());
    }
    for entry in listed {
        let duration = entry
            .session
            .duration()
            .map_or_else(|| "--:--:--".to_string(), format_hms);
        writeln!(
            writer,
            "#{}  {}  {}",
            entry.index,
            summary_line(names, entry.session),
            duration
        )?;
    }
    Ok(())
}
