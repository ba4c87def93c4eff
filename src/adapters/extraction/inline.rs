//! Inline text extraction adapter.
//!
//! Scans free text for `label (=|:) number` token patterns using the same
//! deterministic scanner the classification fallback relies on, so both
//! paths agree on what counts as chartable data.

use async_trait::async_trait;

use crate::domain::chart::DataPoints;
use crate::domain::routing;
use crate::ports::extraction::{ExtractionError, InlineExtractor};

/// Deterministic inline extractor.
#[derive(Debug, Clone, Default)]
pub struct InlineDataExtractor;

impl InlineDataExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InlineExtractor for InlineDataExtractor {
    async fn extract(&self, text: &str) -> Result<DataPoints, ExtractionError> {
        let pairs = routing::scan_label_value_pairs(text);
        DataPoints::new(pairs).ok_or(ExtractionError::NoInlineData)
    }
}
