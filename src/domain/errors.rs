//! Turn-level error taxonomy.
//!
//! Only the fatal-for-turn failures live here. Classification failures are
//! recovered through the heuristic fallback and preference I/O failures
//! degrade to all-null preferences, so neither ever becomes a `TurnError`.

use crate::ports::extraction::ExtractionError;
use crate::ports::renderer::RenderError;

use super::session::MissingParam;

/// A failure that terminates the current turn.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TurnError {
    /// Direct mode only: required parameters stayed unresolved.
    #[error("ambiguous parameters: {}", format_missing(missing))]
    AmbiguousParameters { missing: Vec<MissingParam> },

    /// Data could not be extracted; never reaches the renderer.
    #[error(transparent)]
    DataExtraction(#[from] ExtractionError),

    /// The renderer failed; no partial artifact is reported as success.
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn format_missing(missing: &[MissingParam]) -> String {
    missing
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}
