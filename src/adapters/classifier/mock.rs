//! Mock intent classifier for testing.
//!
//! Configurable to return queued classifications or inject errors, with
//! call tracking for verification. Tests of the orchestration core run
//! against this adapter with zero network access.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::chart::ChartRequest;
use crate::domain::intent::Classification;
use crate::domain::session::Turn;
use crate::ports::classifier::{ClassifierError, IntentClassifier};

/// Mock classifier; responses are consumed in order.
#[derive(Debug, Clone, Default)]
pub struct MockIntentClassifier {
    responses: Arc<Mutex<VecDeque<Result<Classification, ClassifierError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// One recorded classify call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub window: Vec<Turn>,
    pub known_fields: ChartRequest,
}

impl MockIntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful classification.
    pub fn with_classification(self, classification: Classification) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(classification));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: ClassifierError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Calls observed so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntentClassifier for MockIntentClassifier {
    async fn classify(
        &self,
        recent_turns: &[Turn],
        known_fields: &ChartRequest,
    ) -> Result<Classification, ClassifierError> {
        self.calls.lock().unwrap().push(RecordedCall {
            window: recent_turns.to_vec(),
            known_fields: known_fields.clone(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClassifierError::Unavailable(
                    "mock classifier has no queued response".into(),
                ))
            })
    }
}
