//! Intent Classifier Port - interface to the text-classification oracle.
//!
//! The oracle is unreliable by design: its output may be wrapped in
//! incidental formatting, malformed, or the call may fail outright. Every
//! error from this port is recoverable - the orchestrator falls back to a
//! deterministic heuristic, so tests can run with no classifier reachable.

use async_trait::async_trait;

use crate::domain::chart::ChartRequest;
use crate::domain::intent::Classification;
use crate::domain::session::Turn;

/// Port for the intent-classification oracle.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify the recent turn window into a structured intent.
    ///
    /// `known_fields` carries the already-resolved parameters of a pending
    /// request so follow-up turns can be read against context.
    async fn classify(
        &self,
        recent_turns: &[Turn],
        known_fields: &ChartRequest,
    ) -> Result<Classification, ClassifierError>;
}

/// Classification failures. All variants route to the heuristic fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierError {
    /// The oracle did not answer within the bounded timeout.
    #[error("classifier timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Transport-level failure reaching the oracle.
    #[error("classifier transport error: {0}")]
    Transport(String),

    /// The oracle answered but its payload could not be parsed.
    #[error("classifier parse error: {0}")]
    Parse(String),

    /// The oracle is not configured or otherwise unusable.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}
