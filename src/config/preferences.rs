//! Preference store configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Location of the preference file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesConfig {
    /// Explicit settings file path; defaults to
    /// `~/.config/chart-agent/settings.json`.
    pub path: Option<PathBuf>,
}

impl PreferencesConfig {
    /// Resolve the settings file path.
    pub fn settings_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("chart-agent").join("settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let config = PreferencesConfig {
            path: Some(PathBuf::from("/tmp/prefs.json")),
        };

        assert_eq!(config.settings_path(), PathBuf::from("/tmp/prefs.json"));
    }

    #[test]
    fn test_default_path_is_under_config_dir() {
        let config = PreferencesConfig::default();

        let path = config.settings_path();
        assert!(path.ends_with(".config/chart-agent/settings.json"));
    }
}
