//! Import command: merges sessions from a CSV file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::Config;
use crate::commands::util::{open_store, report_outcome};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file with the export header.
    pub path: PathBuf,
}

pub fn run<W: Write>(writer: &mut W, args: &ImportArgs, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    report_outcome(writer, store.import(&args.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    use dt_store::SessionStore;
    use insta::assert_snapshot;

    const CSV: &str = "\
TerritoryId,RouletteId,IsCompleted,BeginAt,EndAt,PlayerJobAbbr,PartyMembers,Settings
1036,1,true,2025-01-05T20:00:00Z,2025-01-05T20:25:00Z,WHM,Alpha @ Cactuar|Beta @ Cactuar,4
0,1,true,2025-01-05T21:00:00Z,N/A,WHM,,0
1037,0,false,01/06/2025 08:15:00 PM,N/A,PLD,,LevelSync
1036,1,true,2025-01-05T20:00:00Z,2025-01-05T20:25:00Z,WHM,alpha @ cactuar|BETA @ cactuar,4
";

    #[test]
    fn import_reports_counts() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sessions.csv");
        std::fs::write(&path, CSV).unwrap();

        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        run(&mut output, &ImportArgs { path }, &config).unwrap();

        assert_snapshot!(
            String::from_utf8(output).unwrap(),
            @"Imported 3 sessions (1 rows skipped, 1 duplicates removed)"
        );
        let sessions = SessionStore::open(temp.path()).unwrap().snapshot();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].territory_id, 1037);
        assert_eq!(sessions[1].end_at, None);
    }

    #[test]
    fn import_of_missing_file_fails() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        let args = ImportArgs {
            path: temp.path().join("nope.csv"),
        };
        let err = run(&mut output, &args, &config).unwrap_err();
        assert!(err.to_string().starts_with("Import failed: import file not found"));
    }
}
