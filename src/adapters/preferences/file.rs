//! JSON file preference store.
//!
//! Persists the preference record as pretty-printed JSON. The first read on
//! a fresh installation creates the backing file with an all-null record.
//! Writes are read-modify-write with last-writer-wins semantics; no
//! cross-session locking.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::domain::preferences::{PreferencePatch, Preferences};
use crate::ports::preferences::{PreferenceError, PreferenceStore};

/// File-backed preference store.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    /// Store backed by the given settings file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an all-null record if absent.
    async fn ensure_exists(&self) -> Result<(), PreferenceError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PreferenceError::Io(e.to_string()))?;
        }

        let blank = serde_json::to_string_pretty(&Preferences::default())
            .map_err(|e| PreferenceError::Io(e.to_string()))?;
        fs::write(&self.path, blank)
            .await
            .map_err(|e| PreferenceError::Io(e.to_string()))?;

        info!(path = %self.path.display(), "created preference file");
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn read(&self) -> Result<Preferences, PreferenceError> {
        self.ensure_exists().await?;

        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(|e| PreferenceError::Io(e.to_string()))?;

        serde_json::from_str(&raw).map_err(|e| PreferenceError::Corrupt(e.to_string()))
    }

    async fn write(&self, patch: PreferencePatch) -> Result<(), PreferenceError> {
        if patch.is_empty() {
            return Ok(());
        }

        // Read-modify-write; a corrupt record is replaced rather than kept.
        let current = match self.read().await {
            Ok(preferences) => preferences,
            Err(PreferenceError::Corrupt(detail)) => {
                debug!(detail, "replacing corrupt preference record");
                Preferences::default()
            }
            Err(other) => return Err(other),
        };

        let merged = current.merged_with(&patch);
        let raw = serde_json::to_string_pretty(&merged)
            .map_err(|e| PreferenceError::Io(e.to_string()))?;
        fs::write(&self.path, raw)
            .await
            .map_err(|e| PreferenceError::Io(e.to_string()))
    }
}
