//! User preference values.
//!
//! Externally owned state: read fresh every turn, partially rewritten after
//! a successful render (last-used) or an explicit config-write (default).

use serde::{Deserialize, Serialize};

use super::chart::{BrandStyle, OutputFormat};
use super::intent::PreferenceUpdate;

/// The full preference record as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub default_style: Option<BrandStyle>,
    pub default_format: Option<OutputFormat>,
    pub last_used_style: Option<BrandStyle>,
    pub last_used_format: Option<OutputFormat>,
}

/// A partial write; only `Some` fields are merged into the stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencePatch {
    pub default_style: Option<BrandStyle>,
    pub default_format: Option<OutputFormat>,
    pub last_used_style: Option<BrandStyle>,
    pub last_used_format: Option<OutputFormat>,
}

impl PreferencePatch {
    /// Patch written after a successful render.
    pub fn last_used(style: BrandStyle, format: OutputFormat) -> Self {
        Self {
            last_used_style: Some(style),
            last_used_format: Some(format),
            ..Self::default()
        }
    }

    /// Patch written for an explicit default-preference request.
    ///
    /// Touches only the `default_*` slot for the chosen target.
    pub fn from_update(update: PreferenceUpdate) -> Self {
        match update {
            PreferenceUpdate::Style(style) => Self {
                default_style: Some(style),
                ..Self::default()
            },
            PreferenceUpdate::Format(format) => Self {
                default_format: Some(format),
                ..Self::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.default_style.is_none()
            && self.default_format.is_none()
            && self.last_used_style.is_none()
            && self.last_used_format.is_none()
    }
}

impl Preferences {
    /// New record with the patch's set fields merged in.
    pub fn merged_with(&self, patch: &PreferencePatch) -> Preferences {
        Preferences {
            default_style: patch.default_style.or(self.default_style),
            default_format: patch.default_format.or(self.default_format),
            last_used_style: patch.last_used_style.or(self.last_used_style),
            last_used_format: patch.last_used_format.or(self.last_used_format),
        }
    }
}
