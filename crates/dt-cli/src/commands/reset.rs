//! Reset command: deletes every session after a double confirmation.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::Config;
use crate::commands::util::open_store;

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// First confirmation.
    #[arg(long)]
    pub yes: bool,

    /// Second confirmation; both are required.
    #[arg(long)]
    pub confirm: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &ResetArgs, config: &Config) -> Result<()> {
    if !(args.yes && args.confirm) {
        bail!("reset deletes every session; pass both --yes and --confirm");
    }
    let store = open_store(config)?;
    let count = store.len();
    store.reset().context("failed to reset store")?;
    writeln!(writer, "Deleted {count} sessions")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use dt_core::DutySession;
    use dt_store::SessionStore;

    fn seeded(dir: &std::path::Path) -> Config {
        let store = SessionStore::open(dir).unwrap();
        store.insert(DutySession::new(1036, 0, Utc::now())).unwrap();
        Config::with_data_dir(dir)
    }

    #[test]
    fn reset_requires_both_confirmations() {
        let temp = tempfile::tempdir().unwrap();
        let config = seeded(temp.path());

        for (yes, confirm) in [(false, false), (true, false), (false, true)] {
            let mut output = Vec::new();
            let err = run(&mut output, &ResetArgs { yes, confirm }, &config).unwrap_err();
            assert!(err.to_string().contains("--yes and --confirm"));
        }
        assert_eq!(SessionStore::open(temp.path()).unwrap().len(), 1);
    }

    #[test]
    fn reset_clears_store() {
        let temp = tempfile::tempdir().unwrap();
        let config = seeded(temp.path());

        let mut output = Vec::new();
        let args = ResetArgs {
            yes: true,
            confirm: true,
        };
        run(&mut output, &args, &config).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Deleted 1 sessions\n");
        assert!(SessionStore::open(temp.path()).unwrap().is_empty());
    }
}
