//! Chart output configuration.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where and how large charts are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory chart files are written into.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 || self.height == 0 {
            return Err(ValidationError::InvalidValue {
                field: "output.width/height",
                reason: "canvas dimensions must be greater than zero",
            });
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}
