//! Spreadsheet extraction adapter over delimited files.
//!
//! Reads the first two columns of a CSV file as (label, value) rows. A
//! leading header row is skipped automatically because its value cell does
//! not parse as a number. Every failure names the resource so the composer
//! can surface a readable message.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::domain::chart::{DataPoint, DataPoints};
use crate::ports::extraction::{ExtractionError, SpreadsheetExtractor};

/// Binary spreadsheet formats the CSV reader cannot interpret.
const BINARY_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "ods"];

/// CSV-backed spreadsheet extractor.
#[derive(Debug, Clone, Default)]
pub struct CsvDataExtractor;

impl CsvDataExtractor {
    pub fn new() -> Self {
        Self
    }

    fn parse_rows(resource: &str, bytes: &[u8]) -> Result<DataPoints, ExtractionError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ExtractionError::BadFormat {
                resource: resource.to_string(),
                detail: e.to_string(),
            })?;

            let label = match record.get(0).map(str::trim) {
                Some(label) if !label.is_empty() => label,
                _ => continue,
            };
            let Some(value) = record.get(1).and_then(|v| v.trim().parse::<f64>().ok()) else {
                // Header rows and stray text land here.
                debug!(resource, label, "skipping non-numeric row");
                continue;
            };
            points.push(DataPoint::new(label, value));
        }

        DataPoints::new(points).ok_or_else(|| ExtractionError::NoValidData {
            resource: resource.to_string(),
        })
    }
}

#[async_trait]
impl SpreadsheetExtractor for CsvDataExtractor {
    async fn extract(&self, path: &Path) -> Result<DataPoints, ExtractionError> {
        let resource = path.display().to_string();

        if !path.exists() {
            return Err(ExtractionError::NotFound { resource });
        }

        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            if BINARY_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
                return Err(ExtractionError::BadFormat {
                    resource,
                    detail: "binary spreadsheet formats are not supported; export as CSV".into(),
                });
            }
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ExtractionError::BadFormat {
                resource: resource.clone(),
                detail: e.to_string(),
            })?;

        Self::parse_rows(&resource, &bytes)
    }
}
