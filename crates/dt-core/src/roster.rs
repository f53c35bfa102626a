//! Party roster tokens recorded with a session.

/// Recorded instead of names when party logging is turned off.
pub const PARTY_LOGGING_DISABLED: &str = "Party Logging Disabled For this Entry";

/// Recorded when the duty was run without a party.
pub const SOLO: &str = "Solo";

/// Smallest party whose roster is recorded.
pub const MIN_PARTY_SIZE: usize = 2;

/// Largest party whose roster is recorded. Alliances are skipped.
pub const MAX_PARTY_SIZE: usize = 8;

/// Returns `true` if a party of `size` members gets its roster recorded.
pub const fn is_recordable_party(size: usize) -> bool {
    size >= MIN_PARTY_SIZE && size <= MAX_PARTY_SIZE
}

/// Formats a roster token: `name @ world`, plus ` (JOB)` when a job is given.
pub fn member_token(name: &str, world: &str, job: Option<&str>) -> String {
    match job {
        Some(job) if !job.is_empty() => format!("{name} @ {world} ({job})"),
        _ => format!("{name} @ {world}"),
    }
}

/// Appends each of `incoming` not already present, compared without case.
///
/// Membership only grows: existing entries keep their position and spelling.
/// Returns the number of entries added.
pub fn merge_members<I, S>(members: &mut Vec<String>, incoming: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut added = 0;
    for candidate in incoming {
        let candidate = candidate.into();
        if candidate.is_empty() {
            continue;
        }
        let folded = candidate.to_lowercase();
        if members.iter().any(|m| m.to_lowercase() == folded) {
            continue;
        }
        members.push(candidate);
        added += 1;
    }
    added
}
