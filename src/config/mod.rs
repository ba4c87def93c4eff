//! Application configuration module.
//!
//! Type-safe configuration loaded from environment variables with the
//! `CHART_AGENT` prefix and `__` as the nesting separator, e.g.
//! `CHART_AGENT__CLASSIFIER__API_KEY=...` or
//! `CHART_AGENT__OUTPUT__DIRECTORY=./charts`. Every section has working
//! defaults, so a bare environment still loads.

mod classifier;
mod error;
mod output;
mod preferences;

pub use classifier::ClassifierConfig;
pub use error::{ConfigError, ValidationError};
pub use output::OutputConfig;
pub use preferences::PreferencesConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Intent classifier (Gemini) settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Chart output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Preference store settings.
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file first when present, then environment variables
    /// with the `CHART_AGENT` prefix.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHART_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.classifier.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_sections_are_usable() {
        let config = AppConfig::default();

        assert_eq!(config.classifier.model, "gemini-2.5-flash");
        assert_eq!(config.output.width, 1000);
        assert!(config.preferences.settings_path().ends_with("settings.json"));
    }
}
