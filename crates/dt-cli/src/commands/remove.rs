//! Remove command: deletes one session by its list position.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::Config;
use crate::commands::util::{load_names, open_store, session_at, summary_line};

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Session number as printed by `list`.
    pub index: usize,
}

pub fn run<W: Write>(writer: &mut W, args: &RemoveArgs, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let names = load_names(config);
    let sessions = store.snapshot();
    let session = session_at(&sessions, args.index)?;

    let removed = store
        .remove(session)
        .context("failed to save after removing session")?;
    if !removed {
        bail!("session #{} changed while removing it", args.index);
    }
    writeln!(writer, "Removed #{}: {}", args.index, summary_line(&names, session))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dt_core::DutySession;
    use dt_store::SessionStore;

    #[test]
    fn remove_deletes_only_the_chosen_session() {
        let temp = tempfile::tempdir().unwrap();
        let store = SessionStore::open(temp.path()).unwrap();
        let begin = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        store.insert(DutySession::new(1036, 0, begin)).unwrap();
        store.insert(DutySession::new(1037, 0, begin)).unwrap();

        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        run(&mut output, &RemoveArgs { index: 1 }, &config).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Removed #1: 2025-02-01 10:00 Territory #1036 [Normal] incomplete\n"
        );

        let remaining = SessionStore::open(temp.path()).unwrap().snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].territory_id, 1037);
    }

    #[test]
    fn remove_rejects_out_of_range_index() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        assert!(run(&mut output, &RemoveArgs { index: 1 }, &config).is_err());
    }
}
