//! CSV exchange format for sessions.
//!
//! One row per session under a fixed header. List-valued party members are
//! flattened with [`encode_party`], which escapes its `|` delimiter so it can
//! never collide with the CSV field separator or with a member name.
//!
//! Reading is lenient about shape (missing optional columns, ragged rows,
//! several timestamp layouts) and strict about content: a row that fails
//! validation is skipped and counted, never fatal.

use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use dt_core::time::{format_end, format_timestamp, parse_timestamp};
use dt_core::{DutySession, DutySettings, ValidationError, parse_bool};

use crate::StoreError;

/// Column names, in file order.
pub const HEADERS: [&str; 8] = [
    "TerritoryId",
    "RouletteId",
    "IsCompleted",
    "BeginAt",
    "EndAt",
    "PlayerJobAbbr",
    "PartyMembers",
    "Settings",
];

const PARTY_DELIMITER: char = '|';
const ESCAPE: char = '\\';

// ========== Party Codec ==========

/// Flattens party members into one field.
///
/// Members are joined with `|`; a literal `|` or `\` inside a member is
/// prefixed with `\`. An empty list encodes to the empty string.
pub fn encode_party(members: &[String]) -> String {
    let mut out = String::new();
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push(PARTY_DELIMITER);
        }
        for ch in member.chars() {
            if ch == PARTY_DELIMITER || ch == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}

/// Inverse of [`encode_party`]. Empty tokens are dropped, which also accepts
/// the trailing delimiter older exports wrote.
pub fn decode_party(field: &str) -> Vec<String> {
    let mut members = Vec::new();
    let mut current = String::new();
    let mut chars = field.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => current.push(chars.next().unwrap_or(ESCAPE)),
            PARTY_DELIMITER => members.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    members.push(current);
    members.retain(|m| !m.is_empty());
    members
}

// ========== Writing ==========

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRow<'a> {
    territory_id: u16,
    roulette_id: u32,
    is_completed: bool,
    begin_at: String,
    end_at: String,
    player_job_abbr: &'a str,
    party_members: String,
    settings: u8,
}

impl<'a> From<&'a DutySession> for CsvRow<'a> {
    fn from(session: &'a DutySession) -> Self {
        Self {
            territory_id: session.territory_id,
            roulette_id: session.roulette_id,
            is_completed: session.is_completed,
            begin_at: format_timestamp(session.begin_at),
            end_at: format_end(session.end_at),
            player_job_abbr: &session.player_job_abbr,
            party_members: encode_party(&session.party_members),
            settings: session.settings.bits(),
        }
    }
}

/// Writes `sessions` to `path` in the given order, header first.
pub fn write_sessions(path: &Path, sessions: &[DutySession]) -> Result<(), StoreError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADERS)?;
    for session in sessions {
        writer.serialize(CsvRow::from(session))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

// ========== Reading ==========

/// Sessions read from a CSV file plus the number of rows rejected.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub sessions: Vec<DutySession>,
    pub skipped: usize,
}

/// One row as found in the file; every column is optional at this stage.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawRow {
    territory_id: Option<String>,
    roulette_id: Option<String>,
    is_completed: Option<String>,
    begin_at: Option<String>,
    end_at: Option<String>,
    player_job_abbr: Option<String>,
    party_members: Option<String>,
    settings: Option<String>,
}

/// Returns the trimmed value, treating blank as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl RawRow {
    fn into_session(self) -> Result<DutySession, ValidationError> {
        let territory_id = match present(self.territory_id.as_deref()) {
            None => return Err(ValidationError::Empty { field: "TerritoryId" }),
            Some(raw) => raw.parse::<u16>().map_err(|_| ValidationError::InvalidNumber {
                field: "TerritoryId",
                value: raw.to_string(),
            })?,
        };
        if territory_id == 0 {
            return Err(ValidationError::UnassignedTerritory);
        }

        let roulette_id = present(self.roulette_id.as_deref())
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| ValidationError::InvalidNumber {
                    field: "RouletteId",
                    value: raw.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(0);

        let is_completed = present(self.is_completed.as_deref())
            .map(parse_bool)
            .transpose()?
            .unwrap_or(false);

        let begin_at = parse_timestamp(self.begin_at.as_deref().unwrap_or_default(), false)?
            .ok_or(ValidationError::Empty { field: "BeginAt" })?;
        let end_at = parse_timestamp(self.end_at.as_deref().unwrap_or_default(), true)?;

        let settings = present(self.settings.as_deref()).map_or_else(DutySettings::empty, |raw| {
            raw.parse().unwrap_or_else(|err| {
                tracing::debug!(value = raw, error = %err, "ignoring unparsable settings");
                DutySettings::empty()
            })
        });

        let mut session = DutySession::new(territory_id, roulette_id, begin_at);
        session.is_completed = is_completed;
        session.end_at = end_at;
        session.player_job_abbr = self.player_job_abbr.unwrap_or_default().trim().to_string();
        session.party_members = self
            .party_members
            .as_deref()
            .map(decode_party)
            .unwrap_or_default();
        session.settings = settings;
        Ok(session)
    }
}

/// Reads sessions from a CSV file with a header row.
///
/// Rows that cannot be decoded or fail validation are skipped and counted.
/// I/O failures abort the read.
pub fn read_sessions(path: &Path) -> Result<ParsedRows, StoreError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)?;

    let mut parsed = ParsedRows::default();
    for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let raw = match result {
            Ok(raw) => raw,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                tracing::debug!(line, error = %err, "skipping undecodable csv row");
                parsed.skipped += 1;
                continue;
            }
        };
        match raw.into_session() {
            Ok(session) => parsed.sessions.push(session),
            Err(err) => {
                tracing::debug!(line, error = %err, "skipping invalid csv row");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}
