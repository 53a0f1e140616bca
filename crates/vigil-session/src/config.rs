//! Session configuration.
//!
//! Loaded from TOML at startup; every field has a sensible default so an
//! absent file is not required for the demo or tests.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use vigil_contracts::error::{VigilError, VigilResult};
use vigil_store::{FileStorage, MemoryStorage, StorageBackend};

/// Tunables for one assessment session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Total assessment time budget, in seconds.
    pub time_budget_secs: u32,

    /// Below this many remaining seconds the timer escalates to urgent.
    pub low_time_threshold_secs: u32,

    /// Path of the durable session blob. `None` selects in-memory storage.
    pub storage_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: 900,
            low_time_threshold_secs: 60,
            storage_path: None,
        }
    }
}

impl SessionConfig {
    /// Parse `s` as TOML configuration.
    pub fn from_toml_str(s: &str) -> VigilResult<Self> {
        toml::from_str(s).map_err(|e| VigilError::Config {
            reason: format!("failed to parse session config TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> VigilResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VigilError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The storage backend this configuration selects: file-backed at
    /// `storage_path` when set, in-memory otherwise.
    pub fn storage_backend(&self) -> Box<dyn StorageBackend> {
        match &self.storage_path {
            Some(path) => Box::new(FileStorage::new(path.clone())),
            None => Box::new(MemoryStorage::new()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
