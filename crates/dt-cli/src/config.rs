//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use dt_tracker::TrackerOptions;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Size-based archiving of the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Archive once the store holds this many sessions. `None` disables it.
    pub threshold: Option<usize>,
    /// Sessions kept in the store after archiving, newest first.
    pub keep: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            keep: 100,
        }
    }
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the session store, journal and CSV files.
    pub data_dir: PathBuf,
    /// JSON name catalog for territories, roulettes and worlds.
    pub names_path: PathBuf,
    #[serde(default)]
    pub tracking: TrackerOptions,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("names_path", &self.names_path)
            .field("tracking", &self.tracking)
            .field("archive", &self.archive)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            names_path: data_dir.join("names.json"),
            data_dir,
            tracking: TrackerOptions::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl Config {
    /// Creates a configuration rooted at `data_dir` with default policies.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            names_path: data_dir.join("names.json"),
            data_dir,
            tracking: TrackerOptions::default(),
            archive: ArchiveConfig::default(),
        }
    }

    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // DT_DATA_DIR, DT_TRACKING__RECORD_SOLO, ...
        figment = figment.merge(Env::prefixed("DT_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for dtrack.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dtrack"))
}

/// Returns the platform-specific data directory for dtrack.
///
/// On Linux: `~/.local/share/dtrack`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dtrack"))
}
