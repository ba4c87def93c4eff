//! Intent classification results.
//!
//! The structured shape the routing layer works with, independent of which
//! classifier adapter (or the deterministic fallback) produced it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::chart::{BrandStyle, ChartRequest, DataPoint, OutputFormat};

/// What the user is asking for this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateChart,
    ModifyChart,
    SetPreference,
    OffTopic,
}

/// Which data operation a modification turn applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOperation {
    #[default]
    Keep,
    Replace,
    Append,
}

/// Partial delta extracted from a modification turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationDelta {
    pub chart_type: Option<super::chart::ChartType>,
    pub style: Option<BrandStyle>,
    pub format: Option<OutputFormat>,
    pub operation: DataOperation,
    pub points: Vec<DataPoint>,
}

/// An explicit default-preference write requested by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreferenceUpdate {
    Style(BrandStyle),
    Format(OutputFormat),
}

impl PreferenceUpdate {
    /// Preference slot name, for confirmation messages.
    pub fn target_name(&self) -> &'static str {
        match self {
            PreferenceUpdate::Style(_) => "style",
            PreferenceUpdate::Format(_) => "format",
        }
    }

    /// The value written, as its canonical token.
    pub fn value_token(&self) -> &'static str {
        match self {
            PreferenceUpdate::Style(style) => style.as_str(),
            PreferenceUpdate::Format(format) => format.as_str(),
        }
    }
}

/// Full structured result of classifying one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    /// Explicit chart parameters and inline data found in the turn.
    pub request: ChartRequest,
    /// Data file the turn referenced, if any.
    pub source_file: Option<PathBuf>,
    /// Present when intent is `SetPreference`.
    pub preference: Option<PreferenceUpdate>,
    /// Present when intent is `ModifyChart`.
    pub delta: Option<ModificationDelta>,
}

impl Classification {
    /// A classification carrying nothing but an intent.
    pub fn of(intent: Intent) -> Self {
        Self {
            intent,
            request: ChartRequest::new(),
            source_file: None,
            preference: None,
            delta: None,
        }
    }

    pub fn with_request(mut self, request: ChartRequest) -> Self {
        self.request = request;
        self
    }

    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    pub fn with_preference(mut self, update: PreferenceUpdate) -> Self {
        self.preference = Some(update);
        self
    }

    pub fn with_delta(mut self, delta: ModificationDelta) -> Self {
        self.delta = Some(delta);
        self
    }
}
