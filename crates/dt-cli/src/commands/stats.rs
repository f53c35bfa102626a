//! Stats command: how often and how long each roulette ran.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use dt_core::query::{
    durations_by_roulette, format_hms, occurrences, occurrences_for_roulette,
};
use dt_core::{DutySession, NameResolver, RouletteId, content_type_label};

use crate::Config;
use crate::commands::util::{load_names, open_store, territory_label};

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Only break down this roulette by territory.
    #[arg(short, long)]
    pub roulette: Option<RouletteId>,
}

pub fn run<W: Write>(writer: &mut W, args: &StatsArgs, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let names = load_names(config);
    let sessions = store.snapshot();

    match args.roulette {
        Some(roulette_id) => write_roulette(writer, &names, &sessions, roulette_id),
        None => write_overview(writer, &names, &sessions),
    }
}

// ========== Overview ==========

fn write_overview<W: Write, R: NameResolver>(
    writer: &mut W,
    names: &R,
    sessions: &[DutySession],
) -> Result<()> {
    let cleared = occurrences(sessions);
    let durations = durations_by_roulette(sessions);
    if cleared.is_empty() && durations.is_empty() {
        writeln!(writer, "No completed sessions.")?;
        return Ok(());
    }

    if !cleared.is_empty() {
        writeln!(writer, "ROULETTE CLEARS")?;
        for occurrence in &cleared {
            writeln!(
                writer,
                "  {:>3}x  {} via {}",
                occurrence.count,
                territory_label(names, occurrence.territory_id),
                content_type_label(names, occurrence.roulette_id)
            )?;
        }
    }

    if !durations.is_empty() {
        writeln!(writer, "TIME SPENT")?;
        for entry in &durations {
            writeln!(
                writer,
                "  {}: {} total, {} average over {} runs",
                content_type_label(names, entry.roulette_id),
                format_hms(entry.total),
                format_hms(entry.average),
                entry.count
            )?;
        }
    }
    Ok(())
}

// ========== Single Roulette ==========

fn write_roulette<W: Write, R: NameResolver>(
    writer: &mut W,
    names: &R,
    sessions: &[DutySession],
    roulette_id: RouletteId,
) -> Result<()> {
    let label = content_type_label(names, roulette_id);
    let by_territory = occurrences_for_roulette(sessions, roulette_id);
    if by_territory.is_empty() {
        writeln!(writer, "No completed sessions for {label}.")?;
        return Ok(());
    }

    let total: usize = by_territory.iter().map(|(_, count)| count).sum();
    writeln!(writer, "{label}: {total} clears")?;
    for (territory_id, count) in by_territory {
        writeln!(writer, "  {count:>3}x  {}", territory_label(names, territory_id))?;
    }
    Ok(())
}
