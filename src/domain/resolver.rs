//! Parameter resolver: the four-tier priority cascade.
//!
//! Style and format resolve through explicit value, default preference,
//! last-used preference, then (format only) a fixed terminal default. Type
//! resolves through explicit value, then a time-indicator heuristic over the
//! leading data labels. Whatever stays unresolved is reported missing;
//! resolution itself never writes preferences.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::chart::{ChartRequest, ChartType, OutputFormat};
use super::preferences::Preferences;
use super::session::MissingParam;

/// How many leading labels the type heuristic inspects.
const TYPE_HEURISTIC_WINDOW: usize = 3;

/// Result of running the cascade over one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The request with every resolvable field filled in.
    pub request: ChartRequest,
    /// Required fields that stayed unresolved, in reporting order.
    pub missing: Vec<MissingParam>,
}

/// Apply the priority cascade to `request` against freshly-read preferences.
pub fn resolve(request: &ChartRequest, preferences: &Preferences) -> Resolution {
    let mut resolved = request.clone();
    let mut missing = Vec::new();

    // Style: explicit > default > last-used; no terminal fallback.
    resolved.style = request
        .style
        .or(preferences.default_style)
        .or(preferences.last_used_style);

    // Format: explicit > default > last-used > fixed raster default.
    resolved.format = request
        .format
        .or(preferences.default_format)
        .or(preferences.last_used_format)
        .or(Some(OutputFormat::Raster));

    // Type: explicit > time-indicator heuristic over leading labels.
    resolved.chart_type = request.chart_type.or_else(|| {
        let labels: Vec<&str> = resolved
            .data
            .as_ref()
            .map(|d| d.labels().take(TYPE_HEURISTIC_WINDOW).collect())
            .unwrap_or_default();
        infer_type_from_labels(&labels)
    });

    if resolved.chart_type.is_none() {
        missing.push(MissingParam::Type);
    }
    if resolved.style.is_none() {
        missing.push(MissingParam::Style);
    }

    Resolution {
        request: resolved,
        missing,
    }
}

static MONTH_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "jan", "january", "feb", "february", "mar", "march", "apr", "april", "may", "jun", "june",
        "jul", "july", "aug", "august", "sep", "sept", "september", "oct", "october", "nov",
        "november", "dec", "december",
        // Dutch
        "januari", "februari", "maart", "mei", "juni", "juli", "augustus", "oktober", "okt",
    ]
    .into_iter()
    .collect()
});

static QUARTER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[Qq][1-4]$").unwrap());
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

/// True when a label reads as a point on a time axis.
fn is_time_indicator(label: &str) -> bool {
    let trimmed = label.trim();
    if QUARTER_PATTERN.is_match(trimmed) || YEAR_PATTERN.is_match(trimmed) {
        return true;
    }
    MONTH_TOKENS.contains(trimmed.to_lowercase().as_str())
}

/// Infer a chart type from leading labels; time-indexed data reads as a line.
///
/// Categorical labels give no inference - the type is reported missing
/// instead of guessed.
fn infer_type_from_labels(labels: &[&str]) -> Option<ChartType> {
    if labels.iter().any(|label| is_time_indicator(label)) {
        Some(ChartType::Line)
    } else {
        None
    }
}
