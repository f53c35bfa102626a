//! Read-only aggregations over recorded sessions.
//!
//! Every function here is pure: it takes a slice of sessions (usually a store
//! snapshot) and returns owned results. Nothing is cached.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeDelta};

use crate::names::{NameResolver, content_type_label};
use crate::session::DutySession;
use crate::types::{RouletteId, TerritoryId};

// ========== Filtering ==========

/// `true` if the session's begin date falls within `[from, to]`, inclusive.
/// A missing bound is open.
pub fn begins_within(session: &DutySession, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    let day = session.begin_at.date_naive();
    from.is_none_or(|from| day >= from) && to.is_none_or(|to| day <= to)
}

/// Keeps sessions whose begin date falls within `[from, to]`.
pub fn filter_by_date<'a>(
    sessions: &'a [DutySession],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<&'a DutySession> {
    sessions
        .iter()
        .filter(|s| begins_within(s, from, to))
        .collect()
}

/// Case-insensitive substring match over the territory name, queue label,
/// job abbreviation and party members. A blank needle matches everything.
pub fn matches_text<R: NameResolver + ?Sized>(session: &DutySession, resolver: &R, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let matches = |text: &str| text.to_lowercase().contains(&needle);
    matches(resolver.territory_name(session.territory_id).as_str())
        || matches(content_type_label(resolver, session.roulette_id).as_str())
        || matches(session.player_job_abbr.as_str())
        || session.party_members.iter().any(|m| matches(m.as_str()))
}

/// Sessions for which [`matches_text`] holds.
pub fn search<'a, R: NameResolver + ?Sized>(
    sessions: &'a [DutySession],
    resolver: &R,
    needle: &str,
) -> Vec<&'a DutySession> {
    sessions
        .iter()
        .filter(|s| matches_text(s, resolver, needle))
        .collect()
}

// ========== Occurrences ==========

/// How often a duty was cleared through a given roulette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub territory_id: TerritoryId,
    pub roulette_id: RouletteId,
    pub count: usize,
}

/// Counts completed roulette sessions per `(territory, roulette)` pair,
/// most frequent first.
pub fn occurrences<'a, I>(sessions: I) -> Vec<Occurrence>
where
    I: IntoIterator<Item = &'a DutySession>,
{
    let mut counts: HashMap<(TerritoryId, RouletteId), usize> = HashMap::new();
    for session in sessions {
        if session.is_completed && session.is_roulette() {
            *counts
                .entry((session.territory_id, session.roulette_id))
                .or_default() += 1;
        }
    }
    let mut result: Vec<Occurrence> = counts
        .into_iter()
        .map(|((territory_id, roulette_id), count)| Occurrence {
            territory_id,
            roulette_id,
            count,
        })
        .collect();
    result.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.roulette_id.cmp(&b.roulette_id))
            .then(a.territory_id.cmp(&b.territory_id))
    });
    result
}

/// Counts completed sessions of one roulette per territory, most frequent first.
pub fn occurrences_for_roulette<'a, I>(sessions: I, roulette_id: RouletteId) -> Vec<(TerritoryId, usize)>
where
    I: IntoIterator<Item = &'a DutySession>,
{
    let mut counts: HashMap<TerritoryId, usize> = HashMap::new();
    for session in sessions {
        if session.is_completed && session.roulette_id == roulette_id {
            *counts.entry(session.territory_id).or_default() += 1;
        }
    }
    let mut result: Vec<(TerritoryId, usize)> = counts.into_iter().collect();
    result.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    result
}

// ========== Durations ==========

/// Time spent in completed sessions of one queue type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouletteDuration {
    pub roulette_id: RouletteId,
    pub total: TimeDelta,
    pub average: TimeDelta,
    pub count: usize,
}

/// Sums the durations of completed, ended sessions per roulette (direct
/// entries grouped under `0`). Non-positive durations are ignored. Sorted by
/// total time, longest first.
pub fn durations_by_roulette<'a, I>(sessions: I) -> Vec<RouletteDuration>
where
    I: IntoIterator<Item = &'a DutySession>,
{
    let mut groups: HashMap<RouletteId, (TimeDelta, usize)> = HashMap::new();
    for session in sessions {
        if !session.is_completed {
            continue;
        }
        let Some(duration) = session.duration() else {
            continue;
        };
        if duration <= TimeDelta::zero() {
            continue;
        }
        let entry = groups
            .entry(session.roulette_id)
            .or_insert((TimeDelta::zero(), 0));
        entry.0 += duration;
        entry.1 += 1;
    }

    let mut result: Vec<RouletteDuration> = groups
        .into_iter()
        .map(|(roulette_id, (total, count))| RouletteDuration {
            roulette_id,
            total,
            average: average(total, count),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.total.cmp(&a.total).then(a.roulette_id.cmp(&b.roulette_id)));
    result
}

fn average(total: TimeDelta, count: usize) -> TimeDelta {
    let Ok(count) = i32::try_from(count) else {
        return TimeDelta::zero();
    };
    if count == 0 {
        return TimeDelta::zero();
    }
    total / count
}

/// Formats a duration as `HH:MM:SS`. Negative durations render as zero.
pub fn format_hms(duration: TimeDelta) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
