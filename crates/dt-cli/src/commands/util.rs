//! Shared utilities for CLI commands.

use std::io::Write;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::{Days, Local, NaiveDate};
use regex::Regex;

use dt_core::{DutySession, NameCatalog, NameResolver, TerritoryId};
use dt_store::{OpOutcome, SessionStore};

use crate::Config;

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: u64 = 1000 * 365;

pub fn open_store(config: &Config) -> Result<SessionStore> {
    SessionStore::open(&config.data_dir)
        .with_context(|| format!("failed to open store in {}", config.data_dir.display()))
}

pub fn load_names(config: &Config) -> NameCatalog {
    NameCatalog::load(&config.names_path)
}

/// Parse a date as `YYYY-MM-DD`, `today`, `yesterday` or relative days/weeks.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    parse_date_from(s, Local::now().date_naive())
}

/// Like [`parse_date`], with relative forms counted back from `today`.
pub fn parse_date_from(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim().to_lowercase();
    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(date);
    }
    match s.as_str() {
        "today" => return Ok(today),
        "yesterday" => return today.pred_opt().context("date out of range"),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(&s) else {
        bail!("Invalid date: {s}. Use YYYY-MM-DD, 'today', 'yesterday' or e.g. '3 days ago'");
    };
    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => bail!("Unknown date unit: {unit}"),
    };
    if days > MAX_RELATIVE_DAYS {
        bail!("Relative date too far back: {s}");
    }
    today
        .checked_sub_days(Days::new(days))
        .context("date out of range")
}

/// Prints an outcome's message; a failed outcome becomes the command's error.
pub fn report_outcome<W: Write>(writer: &mut W, outcome: OpOutcome) -> Result<()> {
    if !outcome.success {
        bail!(outcome.message);
    }
    writeln!(writer, "{}", outcome.message)?;
    Ok(())
}

/// Looks up a session by its 1-based position in `sessions`.
pub fn session_at(sessions: &[DutySession], index: usize) -> Result<&DutySession> {
    index
        .checked_sub(1)
        .and_then(|i| sessions.get(i))
        .with_context(|| format!("no session #{index} (store holds {})", sessions.len()))
}

/// Territory name, or its id when the catalog does not know it.
pub fn territory_label<R: NameResolver + ?Sized>(resolver: &R, id: TerritoryId) -> String {
    let name = resolver.territory_name(id);
    if name.is_empty() {
        format!("Territory #{id}")
    } else {
        name
    }
}

/// One-line summary used by list, remove and status.
pub fn summary_line<R: NameResolver + ?Sized>(resolver: &R, session: &DutySession) -> String {
    let status = if session.is_completed {
        "completed"
    } else {
        "incomplete"
    };
    format!(
        "{} {} [{}] {}",
        session.begin_at.format("%Y-%m-%d %H:%M"),
        territory_label(resolver, session.territory_id),
        dt_core::content_type_label(resolver, session.roulette_id),
        status
    )
}
