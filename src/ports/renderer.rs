//! Chart Renderer Port - produces the output file.
//!
//! The renderer only ever sees a fully-resolved request; partial requests
//! cannot reach it by construction. On failure the turn aborts and no path
//! is ever claimed as produced.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::chart::{BrandStyle, ChartType, DataPoints, OutputFormat, ResolvedChartRequest};

/// One render job: resolved parameters plus the final output filename
/// (extension already forced to match the format).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub chart_type: ChartType,
    pub style: BrandStyle,
    pub format: OutputFormat,
    pub data: DataPoints,
    pub filename: String,
}

impl RenderJob {
    pub fn new(request: &ResolvedChartRequest, filename: String) -> Self {
        Self {
            chart_type: request.chart_type,
            style: request.style,
            format: request.format,
            data: request.data.clone(),
            filename,
        }
    }
}

/// Port for the chart-rendering engine.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render the job and return the absolute path of the produced file.
    async fn render(&self, job: &RenderJob) -> Result<PathBuf, RenderError>;
}

/// Render failures; fatal for the turn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("render backend error: {0}")]
    Backend(String),

    #[error("failed to write chart file: {0}")]
    Io(String),

    /// The build lacks the backend for this format.
    #[error("no {format} backend compiled in; {hint}")]
    UnsupportedFormat { format: &'static str, hint: &'static str },
}
