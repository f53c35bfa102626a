//! Export command: writes every session to a timestamped CSV.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::commands::util::{open_store, report_outcome};

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let store = open_store(config)?;
    report_outcome(writer, store.export())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dt_core::DutySession;
    use dt_store::SessionStore;

    #[test]
    fn export_writes_csv_into_data_dir() {
        let temp = tempfile::tempdir().unwrap();
        let store = SessionStore::open(temp.path()).unwrap();
        let begin = Utc.with_ymd_and_hms(2025, 7, 4, 12, 0, 0).unwrap();
        store.insert(DutySession::new(1036, 0, begin)).unwrap();

        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        run(&mut output, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Exported to "), "{output}");
        let path = output.trim_end().trim_start_matches("Exported to ");
        let csv = std::fs::read_to_string(path).unwrap();
        assert!(csv.starts_with("TerritoryId,RouletteId,IsCompleted,BeginAt,EndAt"));
        assert!(csv.contains("1036,0,false,2025-07-04T12:00:00Z,N/A"));
    }

    #[test]
    fn export_of_empty_store_fails() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(temp.path());
        let mut output = Vec::new();
        let err = run(&mut output, &config).unwrap_err();
        assert_eq!(err.to_string(), "Export failed: no sessions to export");
        assert!(output.is_empty());
    }
}
