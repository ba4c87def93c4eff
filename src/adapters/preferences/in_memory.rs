//! In-memory preference store for tests.
//!
//! Holds the record behind a mutex and supports error injection so the
//! orchestrator's degradation path is testable.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::preferences::{PreferencePatch, Preferences};
use crate::ports::preferences::{PreferenceError, PreferenceStore};

/// Mutex-backed store; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferenceStore {
    record: Arc<Mutex<Preferences>>,
    fail_reads: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(self, preferences: Preferences) -> Self {
        *self.record.lock().unwrap() = preferences;
        self
    }

    /// Make every read fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    /// Make every write fail until reset.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Current record, for assertions.
    pub fn snapshot(&self) -> Preferences {
        *self.record.lock().unwrap()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn read(&self) -> Result<Preferences, PreferenceError> {
        if *self.fail_reads.lock().unwrap() {
            return Err(PreferenceError::Io("injected read failure".into()));
        }
        Ok(*self.record.lock().unwrap())
    }

    async fn write(&self, patch: PreferencePatch) -> Result<(), PreferenceError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(PreferenceError::Io("injected write failure".into()));
        }
        let mut record = self.record.lock().unwrap();
        *record = record.merged_with(&patch);
        Ok(())
    }
}
