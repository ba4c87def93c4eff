//! Session state entity.
//!
//! Every transition returns a new snapshot instead of editing in place, so
//! a sequence of turns can be replayed deterministically in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::chart::{ChartRequest, LastChartRecord};
use super::language::Language;

/// How the session was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// One shot: a single turn, then the process exits.
    Direct,
    /// REPL: turns loop until the caller's exit signal.
    Conversational,
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

/// A required chart parameter that could not be resolved.
///
/// Format is absent on purpose: the cascade gives it a terminal default, so
/// it can never be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingParam {
    Type,
    Style,
}

impl MissingParam {
    /// Human-readable parameter name.
    pub fn name(&self) -> &'static str {
        match self {
            MissingParam::Type => "chart type",
            MissingParam::Style => "style",
        }
    }

    /// CLI flag that supplies this parameter in direct mode.
    pub fn flag(&self) -> &'static str {
        match self {
            MissingParam::Type => "--type <bar|line>",
            MissingParam::Style => "--style <fd|bnr>",
        }
    }
}

impl fmt::Display for MissingParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable snapshot of one session between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub mode: InteractionMode,
    pub turns: Vec<Turn>,
    /// Partially-resolved request carried across an `Ask` suspension.
    pub pending: Option<ChartRequest>,
    /// Parameters named in the last clarification question.
    pub missing: Vec<MissingParam>,
    pub last_chart: Option<LastChartRecord>,
    /// Language detected for the current turn.
    pub language: Language,
}

impl SessionState {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            turns: Vec::new(),
            pending: None,
            missing: Vec::new(),
            last_chart: None,
            language: Language::default(),
        }
    }

    /// Append the user's input and re-detect the turn language.
    pub fn with_user_turn(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut next = self.clone();
        next.language = Language::detect(&text);
        next.turns.push(Turn::user(text));
        next
    }

    /// Append the composed assistant reply.
    pub fn with_assistant_turn(&self, text: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.turns.push(Turn::assistant(text));
        next
    }

    /// Suspend with a partially-resolved request and its open questions.
    pub fn with_pending(&self, pending: ChartRequest, missing: Vec<MissingParam>) -> Self {
        let mut next = self.clone();
        next.pending = Some(pending);
        next.missing = missing;
        next
    }

    /// Drop any suspended request.
    pub fn without_pending(&self) -> Self {
        let mut next = self.clone();
        next.pending = None;
        next.missing.clear();
        next
    }

    /// Replace the last-chart snapshot after a successful render.
    pub fn with_last_chart(&self, record: LastChartRecord) -> Self {
        let mut next = self.clone();
        next.last_chart = Some(record);
        next
    }

    /// The most recent `n` turns, oldest first, for the classifier window.
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Text of the latest user turn, if any.
    pub fn latest_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::User)
            .map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{BrandStyle, ChartRequest};

    #[test]
    fn test_session_state_new_is_empty() {
        let state = SessionState::new(InteractionMode::Conversational);

        assert!(state.turns.is_empty());
        assert!(state.pending.is_none());
        assert!(state.last_chart.is_none());
        assert_eq!(state.language, Language::English);
    }

    #[test]
    fn test_with_user_turn_returns_new_snapshot() {
        let state = SessionState::new(InteractionMode::Conversational);

        let next = state.with_user_turn("A=10, B=20");

        // Original untouched.
        assert!(state.turns.is_empty());
        assert_eq!(next.turns.len(), 1);
        assert_eq!(next.turns[0].role, TurnRole::User);
    }

    #[test]
    fn test_with_user_turn_detects_language() {
        let state = SessionState::new(InteractionMode::Conversational);

        let next = state.with_user_turn("maak een grafiek van de omzet");

        assert_eq!(next.language, Language::Dutch);
    }

    #[test]
    fn test_pending_round_trip() {
        let state = SessionState::new(InteractionMode::Conversational);
        let pending = ChartRequest::new().with_style(BrandStyle::Fd);

        let suspended = state.with_pending(pending.clone(), vec![MissingParam::Type]);
        assert_eq!(suspended.pending.as_ref(), Some(&pending));
        assert_eq!(suspended.missing, vec![MissingParam::Type]);

        let resumed = suspended.without_pending();
        assert!(resumed.pending.is_none());
        assert!(resumed.missing.is_empty());
    }

    #[test]
    fn test_recent_turns_window() {
        let mut state = SessionState::new(InteractionMode::Conversational);
        for i in 0..8 {
            state = state.with_user_turn(format!("turn {i}"));
        }

        let window = state.recent_turns(5);

        assert_eq!(window.len(), 5);
        assert_eq!(window[0].text, "turn 3");
        assert_eq!(window[4].text, "turn 7");
    }

    #[test]
    fn test_latest_user_text_skips_assistant() {
        let state = SessionState::new(InteractionMode::Conversational)
            .with_user_turn("first")
            .with_assistant_turn("reply")
            .with_user_turn("second")
            .with_assistant_turn("reply two");

        assert_eq!(state.latest_user_text(), Some("second"));
    }

    #[test]
    fn test_missing_param_flags() {
        assert_eq!(MissingParam::Type.flag(), "--type <bar|line>");
        assert_eq!(MissingParam::Style.flag(), "--style <fd|bnr>");
    }
}
