//! End-to-end integration tests for the complete duty tracking flow.
//!
//! Tests the full pipeline: replay → list → export → import → dedup
//! by driving the built binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn dtrack_binary() -> String {
    env!("CARGO_BIN_EXE_dtrack").to_string()
}

const NAMES: &str = r#"{
  "territories": { "1036": "Sastasha", "1037": "The Tam-Tara Deepcroft" },
  "roulettes": { "1": "Leveling" },
  "worlds": { "73": "Adamantoise" }
}"#;

const RUN_SCRIPT: &str = r#"{"type":"clock","at":"2025-04-01T19:00:00Z"}
{"type":"player","job_abbr":"WHM"}
{"type":"party","members":[{"name":"Alpha","home_world":73,"job_abbr":"PLD"},{"name":"Beta","home_world":73,"job_abbr":"BLM"}]}
{"type":"queue_popped","roulette_id":1,"settings":4}
{"type":"place_changed","territory_id":1036}
{"type":"advance","seconds":60}
{"type":"activity_started","territory_id":1036}
{"type":"advance","seconds":1500}
{"type":"activity_completed","territory_id":1036}
{"type":"place_changed","territory_id":129}
"#;

/// Writes a config file pointing the store at a data dir inside `temp`.
fn setup(temp: &Path) -> PathBuf {
    let data_dir = temp.join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("names.json"), NAMES).unwrap();

    let config_file = temp.join("config.toml");
    std::fs::write(
        &config_file,
        format!(
            "data_dir = '{}'\nnames_path = '{}'\n\n[tracking]\nlog_party_jobs = true\n",
            data_dir.display(),
            data_dir.join("names.json").display()
        ),
    )
    .unwrap();
    config_file
}

fn dtrack(temp: &Path, config: &Path, args: &[&str]) -> Output {
    Command::new(dtrack_binary())
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("DT_DATA_DIR")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("failed to run dtrack")
}

fn replay(temp: &Path, config: &Path, script: &str) -> Output {
    let mut child = Command::new(dtrack_binary())
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .arg("--config")
        .arg(config)
        .arg("replay")
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(script.as_bytes()).unwrap();
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A replayed roulette run shows up in list and show.
#[test]
fn test_replay_then_list() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let output = replay(temp.path(), &config, RUN_SCRIPT);
    assert!(
        output.status.success(),
        "replay should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout(&output).contains("Recorded 1 sessions"));

    let output = dtrack(temp.path(), &config, &["list"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "#1  2025-04-01 19:01 Sastasha [Leveling] completed  00:25:00"
    );

    let output = dtrack(temp.path(), &config, &["show", "1"]);
    let shown = stdout(&output);
    assert!(shown.contains("Alpha @ Adamantoise (PLD)"), "{shown}");
    assert!(shown.contains("Settings: LevelSync"), "{shown}");
}

/// Export then import into the same store yields only duplicates.
#[test]
fn test_export_import_dedup_round_trip() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());
    assert!(replay(temp.path(), &config, RUN_SCRIPT).status.success());

    let output = dtrack(temp.path(), &config, &["export"]);
    assert!(output.status.success());
    let exported = stdout(&output);
    let csv_path = exported.trim_end().trim_start_matches("Exported to ").to_string();
    assert!(Path::new(&csv_path).is_file(), "{exported}");

    let output = dtrack(temp.path(), &config, &["import", &csv_path]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "Imported 1 sessions (0 rows skipped, 1 duplicates removed)"
    );

    let output = dtrack(temp.path(), &config, &["dedup"]);
    assert_eq!(stdout(&output).trim_end(), "Removed 0 duplicate sessions (1 remain)");
}

/// A logout mid-duty is carried to the next replay through the journal.
#[test]
fn test_logout_recovery_across_runs() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let first = r#"{"type":"clock","at":"2025-04-02T20:00:00Z"}
{"type":"party","members":[{"name":"Alpha","home_world":73},{"name":"Beta","home_world":73}]}
{"type":"queue_popped","roulette_id":1}
{"type":"place_changed","territory_id":1037}
{"type":"logout"}
"#;
    let output = replay(temp.path(), &config, first);
    assert!(stdout(&output).contains("Journaled session awaits recovery"));

    let output = dtrack(temp.path(), &config, &["status"]);
    assert!(stdout(&output).contains("Pending recovery: The Tam-Tara Deepcroft"));

    let second = r#"{"type":"clock","at":"2025-04-02T20:10:00Z"}
{"type":"party","members":[{"name":"Alpha","home_world":73},{"name":"Beta","home_world":73}]}
{"type":"place_changed","territory_id":1037}
{"type":"advance","seconds":300}
{"type":"activity_completed","territory_id":1037}
"#;
    let output = replay(temp.path(), &config, second);
    assert!(stdout(&output).contains("Recorded 1 sessions"));

    let output = dtrack(temp.path(), &config, &["list"]);
    assert_eq!(
        stdout(&output).trim_end(),
        "#1  2025-04-02 20:00 The Tam-Tara Deepcroft [Leveling] completed  00:15:00"
    );
    let output = dtrack(temp.path(), &config, &["status"]);
    assert!(!stdout(&output).contains("Pending recovery"));
}

/// Reset refuses to run without both confirmations.
#[test]
fn test_reset_requires_double_confirmation() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());
    assert!(replay(temp.path(), &config, RUN_SCRIPT).status.success());

    let output = dtrack(temp.path(), &config, &["reset", "--yes"]);
    assert!(!output.status.success());
    let output = dtrack(temp.path(), &config, &["status"]);
    assert!(stdout(&output).contains("Sessions: 1"));

    let output = dtrack(temp.path(), &config, &["reset", "--yes", "--confirm"]);
    assert!(output.status.success());
    let output = dtrack(temp.path(), &config, &["list"]);
    assert_eq!(stdout(&output).trim_end(), "No sessions recorded.");
}

/// Importing a file without any valid row fails and leaves the store alone.
#[test]
fn test_import_rejects_file_without_valid_rows() {
    let temp = TempDir::new().unwrap();
    let config = setup(temp.path());

    let csv = temp.path().join("bad.csv");
    std::fs::write(
        &csv,
        "TerritoryId,RouletteId,IsCompleted,BeginAt\n0,1,true,2025-01-01T00:00:00Z\n1036,1,maybe,2025-01-01T00:00:00Z\n",
    )
    .unwrap();

    let output = dtrack(temp.path(), &config, &["import", csv.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Import failed"), "{stderr}");

    let output = dtrack(temp.path(), &config, &["status"]);
    assert!(stdout(&output).contains("Sessions: 0"));
}
