//! Resolution of numeric identifiers to display names.
//!
//! Names are only used for display, searching and filtering. Identity and
//! equality of sessions never depend on them, and a failed lookup yields an
//! empty string rather than an error.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{RouletteId, TerritoryId, WorldId};

/// Label used for sessions that were not joined through a roulette.
pub const DIRECT_ENTRY_LABEL: &str = "Normal";

/// Looks up display names for identifiers.
///
/// Implementations must be pure: the same id always resolves to the same
/// name, and unknown ids resolve to an empty string.
pub trait NameResolver {
    /// Name of the duty at a territory. Empty for places that are not duties.
    fn territory_name(&self, id: TerritoryId) -> String;

    fn roulette_name(&self, id: RouletteId) -> String;

    fn world_name(&self, id: WorldId) -> String;
}

impl<T: NameResolver + ?Sized> NameResolver for &T {
    fn territory_name(&self, id: TerritoryId) -> String {
        (**self).territory_name(id)
    }

    fn roulette_name(&self, id: RouletteId) -> String {
        (**self).roulette_name(id)
    }

    fn world_name(&self, id: WorldId) -> String {
        (**self).world_name(id)
    }
}

/// Display label for how a session was queued: the roulette name, or
/// [`DIRECT_ENTRY_LABEL`] for direct entries.
pub fn content_type_label<R: NameResolver + ?Sized>(resolver: &R, roulette_id: RouletteId) -> String {
    if roulette_id == 0 {
        DIRECT_ENTRY_LABEL.to_string()
    } else {
        resolver.roulette_name(roulette_id)
    }
}

/// Static name tables loaded from a JSON file.
///
/// ```json
/// { "territories": { "1036": "Sastasha" }, "roulettes": { "1": "Leveling" }, "worlds": { "73": "Adamantoise" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameCatalog {
    #[serde(default)]
    pub territories: HashMap<TerritoryId, String>,
    #[serde(default)]
    pub roulettes: HashMap<RouletteId, String>,
    #[serde(default)]
    pub worlds: HashMap<WorldId, String>,
}

impl NameCatalog {
    /// Loads a catalog, falling back to an empty one if the file is missing
    /// or malformed.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = ?path, error = %err, "failed to read name catalog");
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!(path = ?path, error = %err, "failed to parse name catalog");
                Self::default()
            }
        }
    }
}

impl NameResolver for NameCatalog {
    fn territory_name(&self, id: TerritoryId) -> String {
        self.territories.get(&id).cloned().unwrap_or_default()
    }

    fn roulette_name(&self, id: RouletteId) -> String {
        self.roulettes.get(&id).cloned().unwrap_or_default()
    }

    fn world_name(&self, id: WorldId) -> String {
        self.worlds.get(&id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_resolves_known_and_unknown_ids() {
        let catalog: NameCatalog = serde_json::from_str(
            r#"{"territories": {"1036": "Sastasha"}, "worlds": {"73": "Adamantoise"}}"#,
        )
        .unwrap();
        assert_eq!(catalog.territory_name(1036), "Sastasha");
        assert_eq!(catalog.territory_name(128), "");
        assert_eq!(catalog.world_name(73), "Adamantoise");
        assert_eq!(catalog.roulette_name(1), "");
    }

    #[test]
    fn content_type_label_names_direct_entries() {
        let mut catalog = NameCatalog::default();
        catalog.roulettes.insert(6, "Mentor".to_string());
        assert_eq!(content_type_label(&catalog, 0), "Normal");
        assert_eq!(content_type_label(&catalog, 6), "Mentor");
    }

    #[test]
    fn load_falls_back_to_empty_catalog() {
        let temp = tempfile::tempdir().unwrap();
        let missing = NameCatalog::load(&temp.path().join("missing.json"));
        assert!(missing.territories.is_empty());

        let path = temp.path().join("names.json");
        std::fs::write(&path, "{ not json").unwrap();
        let malformed = NameCatalog::load(&path);
        assert!(malformed.worlds.is_empty());
    }

    #[test]
    fn load_reads_catalog_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("names.json");
        std::fs::write(&path, r#"{"roulettes": {"5": "Alliance Raids"}}"#).unwrap();
        let catalog = NameCatalog::load(&path);
        assert_eq!(catalog.roulette_name(5), "Alliance Raids");
    }
}
