//! Data Extraction Ports - inline text and spreadsheet extraction.
//!
//! Both adapters return ordered `(label, value)` pairs or a typed failure.
//! Failures always reach the response composer as a readable message naming
//! the resource; they never surface as an unhandled crash.

use async_trait::async_trait;
use std::path::Path;

use crate::domain::chart::DataPoints;

/// Port for extracting data points from free text.
#[async_trait]
pub trait InlineExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<DataPoints, ExtractionError>;
}

/// Port for extracting data points from a spreadsheet file.
#[async_trait]
pub trait SpreadsheetExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<DataPoints, ExtractionError>;
}

/// Typed extraction failures; `resource` names what the message refers to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    /// The referenced file does not exist.
    #[error("data source not found: {resource}")]
    NotFound { resource: String },

    /// The file was readable but held no usable (label, value) rows.
    #[error("no valid data in {resource}")]
    NoValidData { resource: String },

    /// The file could not be read as a spreadsheet at all.
    #[error("bad format in {resource}: {detail}")]
    BadFormat { resource: String, detail: String },

    /// The turn text contained no label/value pairs.
    #[error("no chartable label/value pairs found in the message")]
    NoInlineData,
}

impl ExtractionError {
    /// The resource the failure refers to, when there is one.
    pub fn resource(&self) -> Option<&str> {
        match self {
            ExtractionError::NotFound { resource }
            | ExtractionError::NoValidData { resource }
            | ExtractionError::BadFormat { resource, .. } => Some(resource),
            ExtractionError::NoInlineData => None,
        }
    }
}
