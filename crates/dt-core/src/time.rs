//! Timestamp parsing and formatting for session records.
//!
//! Sessions store UTC timestamps. Text written by older exports may use a
//! locale-style layout without an offset; such values are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::types::ValidationError;

/// Placeholder written for a session that has not ended.
pub const NOT_ENDED: &str = "N/A";

/// Layouts tried, in order, after RFC 3339.
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Parses a timestamp through the fallback chain of accepted layouts.
///
/// With `allow_empty`, blank values and `N/A` yield `Ok(None)`. The legacy
/// minimum date (`0001-01-01 00:00:00`) is also treated as "no timestamp",
/// since older exports wrote it for sessions that never ended.
pub fn parse_timestamp(
    value: &str,
    allow_empty: bool,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NOT_ENDED) {
        return if allow_empty {
            Ok(None)
        } else {
            Err(ValidationError::Empty { field: "timestamp" })
        };
    }

    let parsed = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|naive| naive.and_utc())
        })
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            value: value.to_string(),
        })?;

    if is_legacy_minimum(parsed) {
        return if allow_empty {
            Ok(None)
        } else {
            Err(ValidationError::InvalidTimestamp {
                value: value.to_string(),
            })
        };
    }
    Ok(Some(parsed))
}

/// Formats a timestamp so that [`parse_timestamp`] reads back the same instant.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Formats an optional end timestamp, writing [`NOT_ENDED`] for `None`.
pub fn format_end(end: Option<DateTime<Utc>>) -> String {
    end.map_or_else(|| NOT_ENDED.to_string(), format_timestamp)
}

fn is_legacy_minimum(timestamp: DateTime<Utc>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .is_some_and(|minimum| timestamp.naive_utc() == minimum)
}
