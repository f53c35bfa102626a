//! Single-slot recovery record for a session interrupted by a logout.

use std::path::{Path, PathBuf};

use dt_core::{DutySession, SCHEMA_VERSION};

use crate::StoreError;
use crate::fs::atomic_write;

/// Holds at most one in-progress session across a disconnect.
///
/// The journal is "dirty" while an unresolved entry exists. At startup the
/// presence of the journal file is the dirty signal.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    dirty: bool,
}

impl Journal {
    /// Opens the journal in `data_dir`. Does not read the entry yet.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(format!("temp_v{SCHEMA_VERSION}.json"));
        let dirty = path.is_file();
        if dirty {
            tracing::info!(path = ?path, "found journaled session awaiting recovery");
        }
        Self { path, dirty }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Overwrites the slot with `session` and marks the journal dirty.
    pub fn save_in_progress(&mut self, session: &DutySession) -> Result<(), StoreError> {
        let json = serde_json::to_vec(session)?;
        atomic_write(&self.path, &json)?;
        self.dirty = true;
        tracing::debug!(territory_id = session.territory_id, "journaled in-progress session");
        Ok(())
    }

    /// Reads the journaled session. A missing or malformed file yields `None`.
    pub fn load_in_progress(&self) -> Option<DutySession> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "failed to read journal");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "failed to parse journal");
                None
            }
        }
    }

    /// Resolves the entry: clears the dirty flag and deletes the file.
    pub fn clear(&mut self) {
        self.dirty = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = ?self.path, error = %e, "failed to remove journal"),
        }
    }
}
