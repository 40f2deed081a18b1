//! Scheduler configuration, loadable from TOML.
//!
//! Every field is optional; anything left out keeps its default.
//!
//! ```toml
//! [preferences]
//! days = ["Mon", "Tue", "Wed", "Thu", "Fri"]
//! hours = [9, 10, 13, 14]
//!
//! [search]
//! max_candidates = 10000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SchedulerError;
use crate::preferences::Preferences;
use crate::suggest::SearchLimit;

/// Errors raised while loading a [`SchedulerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] SchedulerError),
}

/// Process-wide defaults for a [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Used by the suggestion forms that take no explicit preferences.
    pub preferences: Preferences,
    pub search: SearchLimit,
}

impl SchedulerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        self.preferences.validate()?;
        self.search.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_empty_document_is_default() {
        let config = SchedulerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
        assert_eq!(config.search.max_candidates, 10_000);
    }

    #[test]
    fn test_partial_document_overrides_only_given_fields() {
        let config = SchedulerConfig::from_toml_str(
            r#"
            [preferences]
            days = ["Sat", "Sun"]

            [search]
            max_candidates = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.preferences.days, vec![Weekday::Sat, Weekday::Sun]);
        assert_eq!(config.preferences.hours, vec![9, 10, 13, 14]);
        assert_eq!(config.search.max_candidates, 50);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SchedulerConfig::from_toml_str("[preferences]\nhours = []").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(SchedulerError::InvalidInput(_))));

        let err = SchedulerConfig::from_toml_str("[search]\nmax_candidates = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_day_is_parse_error() {
        let err = SchedulerConfig::from_toml_str("[preferences]\ndays = [\"Funday\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SchedulerConfig::load(Path::new("/nonexistent/meetings.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/meetings.toml"));
    }
}
