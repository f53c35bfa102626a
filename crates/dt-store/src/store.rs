//! The durable list of finalized sessions.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;

use dt_core::{DutySession, SCHEMA_VERSION, dedup_sessions};

use crate::fs::{atomic_write, timestamped_csv_path};
use crate::{OpOutcome, StoreError, tabular};

/// Summary of a successful CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows that passed validation and were merged.
    pub imported: usize,
    /// Rows rejected by validation.
    pub skipped: usize,
    /// Sessions dropped by the deduplication pass after merging.
    pub duplicates_removed: usize,
}

/// Finalized sessions, backed by one JSON file.
///
/// See the [crate documentation](crate) for the locking discipline.
#[derive(Debug)]
pub struct SessionStore {
    data_dir: PathBuf,
    data_path: PathBuf,
    sessions: Mutex<Vec<DutySession>>,
}

impl SessionStore {
    /// Opens the store in `data_dir`, creating the directory and an empty data
    /// file if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
        let data_path = data_dir.join(format!("data_v{SCHEMA_VERSION}.json"));
        let store = Self {
            data_dir,
            data_path,
            sessions: Mutex::new(Vec::new()),
        };
        store.load()?;
        if !store.data_path.exists() {
            store.save()?;
        }
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// A poisoned lock still guards a valid list, so it is recovered.
    fn lock(&self) -> MutexGuard<'_, Vec<DutySession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, sessions: &[DutySession]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(sessions)?;
        atomic_write(&self.data_path, &json)
    }

    /// Writes `next` and only then swaps it in, so a failed write leaves the
    /// in-memory list matching the file.
    fn commit(
        &self,
        sessions: &mut Vec<DutySession>,
        next: Vec<DutySession>,
    ) -> Result<(), StoreError> {
        self.persist(&next)?;
        *sessions = next;
        Ok(())
    }

    // ========== Load / Save ==========

    /// Replaces the in-memory list with the file contents.
    ///
    /// A missing file reads as empty. A malformed file is moved aside to
    /// `<name>.corrupt` and the store starts empty.
    pub fn load(&self) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let content = match std::fs::read_to_string(&self.data_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.data_path, "no session store yet");
                sessions.clear();
                return Ok(());
            }
            Err(e) => return Err(StoreError::io(&self.data_path, e)),
        };

        match serde_json::from_str::<Vec<DutySession>>(&content) {
            Ok(loaded) => {
                tracing::debug!(count = loaded.len(), path = ?self.data_path, "loaded sessions");
                *sessions = loaded;
            }
            Err(err) => {
                let backup = self.data_path.with_extension("json.corrupt");
                tracing::error!(
                    path = ?self.data_path,
                    backup = ?backup,
                    error = %err,
                    "failed to parse session store, starting empty"
                );
                if let Err(e) = std::fs::rename(&self.data_path, &backup) {
                    tracing::warn!(error = %e, "failed to move corrupt store aside");
                }
                sessions.clear();
            }
        }
        Ok(())
    }

    /// Writes the whole list to disk.
    pub fn save(&self) -> Result<(), StoreError> {
        let sessions = self.lock();
        self.persist(&sessions)
    }

    // ========== Mutations ==========

    /// Appends a finalized session and persists.
    pub fn insert(&self, session: DutySession) -> Result<(), StoreError> {
        if session.validate().is_err() {
            return Err(StoreError::UnassignedTerritory);
        }
        let mut sessions = self.lock();
        let mut next = sessions.clone();
        next.push(session);
        self.commit(&mut sessions, next)?;
        tracing::debug!(count = sessions.len(), "session stored");
        Ok(())
    }

    /// Removes the first session structurally equal to `session`.
    ///
    /// Returns `false` (and writes nothing) if no such session exists.
    pub fn remove(&self, session: &DutySession) -> Result<bool, StoreError> {
        let mut sessions = self.lock();
        let Some(index) = sessions.iter().position(|s| s == session) else {
            return Ok(false);
        };
        let mut next = sessions.clone();
        next.remove(index);
        self.commit(&mut sessions, next)?;
        Ok(true)
    }

    /// Deletes every session. Callers are responsible for confirming first.
    pub fn reset(&self) -> Result<(), StoreError> {
        let mut sessions = self.lock();
        let removed = sessions.len();
        self.commit(&mut sessions, Vec::new())?;
        tracing::info!(removed, "session store reset");
        Ok(())
    }

    /// Collapses structurally equal sessions, keeping first occurrences.
    ///
    /// Returns the number of sessions removed.
    pub fn deduplicate(&self) -> Result<usize, StoreError> {
        let mut sessions = self.lock();
        let mut next = sessions.clone();
        let removed = dedup_sessions(&mut next);
        if removed > 0 {
            self.commit(&mut sessions, next)?;
        }
        Ok(removed)
    }

    // ========== Snapshots ==========

    /// Copy of every stored session, in store order.
    pub fn snapshot(&self) -> Vec<DutySession> {
        self.lock().clone()
    }

    /// The most recently stored session.
    pub fn last(&self) -> Option<DutySession> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // ========== Export / Import ==========

    /// Writes all sessions, oldest first, to a new timestamped CSV file in the
    /// data directory and returns its path.
    pub fn export_csv(&self) -> Result<PathBuf, StoreError> {
        let sessions = self.lock();
        if sessions.is_empty() {
            return Err(StoreError::NothingToExport);
        }
        let path = timestamped_csv_path(&self.data_dir, "export", Local::now());
        write_sorted(&path, &sessions)?;
        tracing::info!(path = ?path, count = sessions.len(), "exported sessions");
        Ok(path)
    }

    /// [`export_csv`](Self::export_csv) reported as a user-facing outcome.
    pub fn export(&self) -> OpOutcome {
        match self.export_csv() {
            Ok(path) => OpOutcome::succeeded(format!("Exported to {}", path.display())),
            Err(err) => {
                tracing::error!(error = %err, "export failed");
                OpOutcome::failed(format!("Export failed: {err}"))
            }
        }
    }

    /// Merges the valid rows of a CSV file into the store, deduplicates and
    /// persists.
    ///
    /// Rejected rows are counted in the report. A file with no valid rows is
    /// an error and leaves the store untouched.
    pub fn import_csv(&self, path: &Path) -> Result<ImportReport, StoreError> {
        if !path.is_file() {
            return Err(StoreError::ImportFileMissing(path.to_path_buf()));
        }
        let parsed = tabular::read_sessions(path)?;
        if parsed.sessions.is_empty() {
            return Err(StoreError::NoValidRows {
                path: path.to_path_buf(),
                skipped: parsed.skipped,
            });
        }

        let imported = parsed.sessions.len();
        let mut sessions = self.lock();
        let mut next = sessions.clone();
        next.extend(parsed.sessions);
        let duplicates_removed = dedup_sessions(&mut next);
        self.commit(&mut sessions, next)?;

        let report = ImportReport {
            imported,
            skipped: parsed.skipped,
            duplicates_removed,
        };
        tracing::info!(path = ?path, ?report, "imported sessions");
        Ok(report)
    }

    /// [`import_csv`](Self::import_csv) reported as a user-facing outcome.
    pub fn import(&self, path: &Path) -> OpOutcome {
        match self.import_csv(path) {
            Ok(report) => OpOutcome::succeeded(format!(
                "Imported {} sessions ({} rows skipped, {} duplicates removed)",
                report.imported, report.skipped, report.duplicates_removed
            )),
            Err(err) => {
                tracing::error!(path = ?path, error = %err, "import failed");
                OpOutcome::failed(format!("Import failed: {err}"))
            }
        }
    }

    // ========== Archive ==========

    /// Once the store holds `threshold` or more sessions, exports all of them
    /// to a timestamped `archive-*.csv` and keeps only the `keep` newest
    /// (by begin time). Returns the archive path if one was written.
    pub fn archive(&self, threshold: usize, keep: usize) -> Result<Option<PathBuf>, StoreError> {
        let mut sessions = self.lock();
        if threshold == 0 || sessions.len() < threshold {
            return Ok(None);
        }

        let path = timestamped_csv_path(&self.data_dir, "archive", Local::now());
        write_sorted(&path, &sessions)?;

        let mut next = sessions.clone();
        next.sort_by_key(|s| s.begin_at);
        let archived = next.len().saturating_sub(keep);
        next.drain(..archived);
        self.commit(&mut sessions, next)?;

        tracing::info!(path = ?path, archived, kept = sessions.len(), "archived sessions");
        Ok(Some(path))
    }
}

fn write_sorted(path: &Path, sessions: &[DutySession]) -> Result<(), StoreError> {
    let mut sorted = sessions.to_vec();
    sorted.sort_by_key(|s| s.begin_at);
    tabular::write_sessions(path, &sorted)
}
