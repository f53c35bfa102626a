//! File helpers shared by the store and the journal.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::StoreError;

/// Writes `contents` to `path` atomically using a temp file + rename.
///
/// The temp file is created in the same directory so the rename stays on one
/// filesystem. Readers see either the previous contents or the new ones.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(contents).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

/// Returns `<dir>/<prefix>-YYYY-MM-DD HH-MM-SS.csv`, adding `-1`, `-2`, ...
/// when a file of that name already exists.
pub fn timestamped_csv_path(dir: &Path, prefix: &str, now: DateTime<Local>) -> PathBuf {
    let stem = format!("{prefix}-{}", now.format("%Y-%m-%d %H-%M-%S"));
    let first = dir.join(format!("{stem}.csv"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{stem}-{n}.csv")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}
