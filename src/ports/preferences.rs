//! Preference Store Port - persisted default/last-used style and format.
//!
//! The store is injected as an explicit collaborator; every read and write
//! is a call with a return value, never an ambient singleton. Reads happen
//! fresh each turn. Store failures are recoverable: the orchestrator
//! proceeds as if no preferences exist.

use async_trait::async_trait;

use crate::domain::preferences::{PreferencePatch, Preferences};

/// Port for the externally-owned preference record.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read the full record; a fresh installation returns all-null and
    /// implicitly creates the backing resource.
    async fn read(&self) -> Result<Preferences, PreferenceError>;

    /// Merge only the patch's set keys into the stored record.
    ///
    /// Concurrent sessions use last-writer-wins; no cross-session locking.
    async fn write(&self, patch: PreferencePatch) -> Result<(), PreferenceError>;
}

/// Preference I/O failures. Always recoverable at the turn level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference store I/O error: {0}")]
    Io(String),

    #[error("preference store holds unreadable data: {0}")]
    Corrupt(String),
}
