//! Dedup command.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;
use crate::commands::util::open_store;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<usize> {
    let store = open_store(config)?;
    let removed = store
        .deduplicate()
        .context("failed to save deduplicated sessions")?;
    writeln!(writer, "Removed {removed} duplicate sessions ({} remain)", store.len())?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dt_core::DutySession;
    use dt_store::SessionStore;

    #[test]
    fn dedup_removes_structural_duplicates() {
        let temp = tempfile::tempdir().unwrap();
        let store = SessionStore::open(temp.path()).unwrap();
        let begin = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let mut first = DutySession::new(1036, 1, begin);
        first.party_members = vec!["Alpha @ Cactuar".to_string()];
        let mut second = first.clone();
        second.party_members = vec!["ALPHA @ CACTUAR".to_string()];
        store.insert(first).unwrap();
        store.insert(second).unwrap();
        store.insert(DutySession::new(1037, 1, begin)).unwrap();

        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        assert_eq!(run(&mut output, &config).unwrap(), 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Removed 1 duplicate sessions (2 remain)\n"
        );

        let mut output = Vec::new();
        assert_eq!(run(&mut output, &config).unwrap(), 0);
    }
}
