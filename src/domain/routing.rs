//! Classification routing: defensive payload parsing and the deterministic
//! fallback.
//!
//! The classifier oracle is unreliable by contract. Its payload may arrive
//! wrapped in code fences or surrounding prose; this module strips such
//! wrapping and parses defensively. When parsing still fails, or the oracle
//! is unreachable, [`fallback_classification`] produces a usable result from
//! the turn text alone - it must keep working with no classifier reachable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::chart::{ChartRequest, DataPoint, DataPoints};
use super::intent::{Classification, DataOperation, Intent, ModificationDelta, PreferenceUpdate};

/// How many recent turns are handed to the classifier.
pub const CLASSIFIER_WINDOW: usize = 5;

/// Classifier payload that could not be turned into a [`Classification`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("no JSON object found in classifier output")]
    NoJsonObject,

    #[error("malformed classifier JSON: {0}")]
    MalformedJson(String),

    #[error("unknown intent: {0:?}")]
    UnknownIntent(String),
}

/// Wire schema the classifier is asked to emit.
///
/// Every field except `intent` is optional; aux fields that fail to parse
/// into domain tokens are dropped rather than failing the whole turn.
#[derive(Debug, Deserialize)]
struct WirePayload {
    intent: String,
    chart_type: Option<String>,
    style: Option<String>,
    format: Option<String>,
    filename: Option<String>,
    #[serde(default)]
    data: Vec<WirePoint>,
    source_file: Option<String>,
    preference_target: Option<String>,
    preference_value: Option<String>,
    data_operation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    label: String,
    value: f64,
}

/// Parse a raw classifier response into a [`Classification`].
///
/// Strips incidental wrapping first, then applies the wire schema.
pub fn parse_classifier_payload(raw: &str) -> Result<Classification, PayloadError> {
    let body = strip_wrapping(raw).ok_or(PayloadError::NoJsonObject)?;

    let wire: WirePayload =
        serde_json::from_str(body).map_err(|e| PayloadError::MalformedJson(e.to_string()))?;

    let intent = match wire.intent.trim() {
        "create_chart" => Intent::CreateChart,
        "modify_chart" => Intent::ModifyChart,
        "set_preference" => Intent::SetPreference,
        "off_topic" => Intent::OffTopic,
        other => return Err(PayloadError::UnknownIntent(other.to_string())),
    };

    let chart_type = parse_aux(wire.chart_type.as_deref(), "chart_type");
    let style = parse_aux(wire.style.as_deref(), "style");
    let format = parse_aux(wire.format.as_deref(), "format");

    let points: Vec<DataPoint> = wire
        .data
        .iter()
        .map(|p| DataPoint::new(p.label.trim(), p.value))
        .collect();

    let mut request = ChartRequest {
        chart_type,
        style,
        format,
        filename: wire.filename.clone(),
        data: DataPoints::new(points.clone()),
    };

    let mut classification = Classification::of(intent);

    match intent {
        Intent::SetPreference => {
            classification.preference = parse_preference(
                wire.preference_target.as_deref(),
                wire.preference_value.as_deref(),
            );
        }
        Intent::ModifyChart => {
            let operation = match wire.data_operation.as_deref().map(str::trim) {
                Some("replace") => DataOperation::Replace,
                Some("append") => DataOperation::Append,
                Some("keep") | None => DataOperation::Keep,
                Some(other) => {
                    debug!(value = other, "ignoring unknown data_operation");
                    DataOperation::Keep
                }
            };
            classification.delta = Some(ModificationDelta {
                chart_type,
                style,
                format,
                operation,
                points,
            });
            // The delta owns modification data; keep the request bare of it.
            request.data = None;
        }
        Intent::CreateChart | Intent::OffTopic => {}
    }

    classification.request = request;
    classification.source_file = wire
        .source_file
        .filter(|s| !s.trim().is_empty())
        .map(Into::into);

    Ok(classification)
}

/// Locate the structured body inside incidental wrapping.
///
/// Prefers a fenced code block; otherwise takes the outermost brace span.
fn strip_wrapping(raw: &str) -> Option<&str> {
    static FENCE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").unwrap());

    if let Some(captures) = FENCE.captures(raw) {
        if let Some(inner) = captures.get(1) {
            let inner = inner.as_str().trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

fn parse_aux<T: std::str::FromStr>(value: Option<&str>, field: &'static str) -> Option<T> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(field, value = raw, "dropping unparsable aux field");
            None
        }
    }
}

fn parse_preference(target: Option<&str>, value: Option<&str>) -> Option<PreferenceUpdate> {
    match target?.trim() {
        "style" => value?.parse().ok().map(PreferenceUpdate::Style),
        "format" => value?.parse().ok().map(PreferenceUpdate::Format),
        other => {
            debug!(target = other, "ignoring unknown preference target");
            None
        }
    }
}

/// Matches `label = number` and `label: number` token patterns. Labels are
/// single tokens; multi-word labels come from the oracle, not the scanner.
static PAIR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\p{L}\p{N}][\p{L}\p{N}_\-]*)\s*[=:]\s*(-?\d+(?:\.\d+)?)").unwrap()
});

/// Scan free text for ordered `(label, value)` pairs.
pub fn scan_label_value_pairs(text: &str) -> Vec<DataPoint> {
    PAIR_PATTERN
        .captures_iter(text)
        .filter_map(|captures| {
            let label = captures.get(1)?.as_str().trim();
            let value: f64 = captures.get(2)?.as_str().parse().ok()?;
            if label.is_empty() {
                None
            } else {
                Some(DataPoint::new(label, value))
            }
        })
        .collect()
}

/// Deterministic classification used when the oracle fails.
///
/// Any `label (=|:) number` hits in the latest turn make it a create request
/// carrying the raw pairs; otherwise the turn is off-topic.
pub fn fallback_classification(latest_turn: &str) -> Classification {
    let pairs = scan_label_value_pairs(latest_turn);
    match DataPoints::new(pairs) {
        Some(data) => Classification::of(Intent::CreateChart)
            .with_request(ChartRequest::new().with_data(data)),
        None => Classification::of(Intent::OffTopic),
    }
}
