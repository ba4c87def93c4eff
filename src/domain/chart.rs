//! Chart request and data model.
//!
//! A `ChartRequest` is the possibly-partial bundle of parameters gathered for
//! one chart; `ResolvedChartRequest` is the fully-resolved form that is the
//! only type the renderer port accepts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Chart type supported by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
}

impl ChartType {
    /// Canonical token used in CLI flags and classifier payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            other => Err(ParseValueError::new("chart type", other)),
        }
    }
}

/// Named brand palette applied to a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandStyle {
    Fd,
    Bnr,
}

impl BrandStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrandStyle::Fd => "fd",
            BrandStyle::Bnr => "bnr",
        }
    }

    /// Color palette for this brand.
    pub fn palette(&self) -> BrandPalette {
        match self {
            BrandStyle::Fd => BrandPalette {
                primary: "#379596",
                content: "#191919",
                background: "#ffeadb",
            },
            BrandStyle::Bnr => BrandPalette {
                primary: "#ffd200",
                content: "#000000",
                background: "#ffffff",
            },
        }
    }
}

impl fmt::Display for BrandStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrandStyle {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fd" => Ok(BrandStyle::Fd),
            "bnr" => Ok(BrandStyle::Bnr),
            other => Err(ParseValueError::new("brand style", other)),
        }
    }
}

/// Brand color palette as hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandPalette {
    pub primary: &'static str,
    pub content: &'static str,
    pub background: &'static str,
}

/// Output format of the rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Raster,
    Vector,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Raster => "raster",
            OutputFormat::Vector => "vector",
        }
    }

    /// File extension forced onto every output path.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Raster => "png",
            OutputFormat::Vector => "svg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Users and the classifier say either the abstract name or the
        // concrete extension.
        match s.trim().to_ascii_lowercase().as_str() {
            "raster" | "png" => Ok(OutputFormat::Raster),
            "vector" | "svg" => Ok(OutputFormat::Vector),
            other => Err(ParseValueError::new("output format", other)),
        }
    }
}

/// Failed to parse a user- or classifier-supplied token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind}: {value:?}")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A single labelled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Non-empty ordered sequence of data points.
///
/// Duplicate labels are permitted and preserved in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoints(Vec<DataPoint>);

impl DataPoints {
    /// Returns `None` when `points` is empty.
    pub fn new(points: Vec<DataPoint>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self(points))
        }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; emptiness is excluded by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.label.as_str())
    }

    /// New sequence with `extra` appended after the existing points.
    pub fn appended(&self, extra: &[DataPoint]) -> Self {
        let mut points = self.0.clone();
        points.extend_from_slice(extra);
        Self(points)
    }
}

/// Possibly-partial chart parameters accumulated for one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub chart_type: Option<ChartType>,
    pub style: Option<BrandStyle>,
    pub format: Option<OutputFormat>,
    pub filename: Option<String>,
    pub data: Option<DataPoints>,
}

impl ChartRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = Some(chart_type);
        self
    }

    pub fn with_style(mut self, style: BrandStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_data(mut self, data: DataPoints) -> Self {
        self.data = Some(data);
        self
    }

    /// True when no field has been populated at all.
    pub fn is_blank(&self) -> bool {
        self.chart_type.is_none()
            && self.style.is_none()
            && self.format.is_none()
            && self.filename.is_none()
            && self.data.is_none()
    }

    /// New request taking every set field of `other`, falling back to `self`.
    ///
    /// Used to layer the current turn's explicit values over a pending
    /// request carried across an `Ask` suspension.
    pub fn overlaid_with(&self, other: &ChartRequest) -> ChartRequest {
        ChartRequest {
            chart_type: other.chart_type.or(self.chart_type),
            style: other.style.or(self.style),
            format: other.format.or(self.format),
            filename: other.filename.clone().or_else(|| self.filename.clone()),
            data: other.data.clone().or_else(|| self.data.clone()),
        }
    }
}

/// Fully-resolved request; the only input the renderer accepts.
///
/// Constructed exclusively by the ambiguity policy once type, style, format
/// and data are all present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChartRequest {
    pub chart_type: ChartType,
    pub style: BrandStyle,
    pub format: OutputFormat,
    pub filename: Option<String>,
    pub data: DataPoints,
}

/// Snapshot of the most recently rendered chart, used only by the
/// modification merger on a later turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastChartRecord {
    pub chart_type: ChartType,
    pub style: BrandStyle,
    pub format: OutputFormat,
    pub data: DataPoints,
    pub filepath: PathBuf,
    pub rendered_at: DateTime<Utc>,
}

impl LastChartRecord {
    pub fn new(request: &ResolvedChartRequest, filepath: PathBuf) -> Self {
        Self {
            chart_type: request.chart_type,
            style: request.style,
            format: request.format,
            data: request.data.clone(),
            filepath,
            rendered_at: Utc::now(),
        }
    }
}
