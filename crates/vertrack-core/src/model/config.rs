//! System configuration entries and the version-line view derived from them.
//!
//! The flat key/value store understands two shapes:
//! - `active_version_lines`: JSON array of version lines, e.g. `["25.8","25.10"]`
//! - `baseline_<line>`: the baseline version of that line, e.g. `baseline_25.8 = 25.8.2`
//!
//! Any other key is passed through untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError};

/// Key holding the JSON array of active version lines
pub const ACTIVE_VERSION_LINES_KEY: &str = "active_version_lines";

/// Prefix of per-line baseline keys
pub const BASELINE_KEY_PREFIX: &str = "baseline_";

/// Config key for the baseline of `line`
pub fn baseline_key(line: &str) -> String {
    format!("{}{}", BASELINE_KEY_PREFIX, line)
}

/// One row of the key/value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Active version lines and their baselines, resolved from config entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLineConfig {
    /// In configured order
    pub active_lines: Vec<String>,
    /// line → baseline version
    pub baselines: BTreeMap<String, String>,
}

impl VersionLineConfig {
    /// Build from raw config entries
    ///
    /// A missing `active_version_lines` key yields no active lines.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `active_version_lines` is not a JSON array of strings.
    pub fn from_entries(entries: &[ConfigEntry]) -> Result<Self> {
        let mut config = VersionLineConfig::default();
        for entry in entries {
            if entry.key == ACTIVE_VERSION_LINES_KEY {
                config.active_lines = parse_active_lines(&entry.value)?;
            } else if let Some(line) = entry.key.strip_prefix(BASELINE_KEY_PREFIX) {
                config
                    .baselines
                    .insert(line.to_string(), entry.value.clone());
            }
        }
        Ok(config)
    }

    /// Baseline version of an active or inactive line
    pub fn baseline(&self, line: &str) -> Option<&str> {
        self.baselines.get(line).map(String::as_str)
    }
}

/// Parse the `active_version_lines` JSON array
///
/// # Errors
///
/// Returns `InvalidConfig` if the value is not a JSON array of strings.
pub fn parse_active_lines(value: &str) -> Result<Vec<String>> {
    serde_json::from_str::<Vec<String>>(value).map_err(|e| TrackerError::InvalidConfig {
        key: ACTIVE_VERSION_LINES_KEY.to_string(),
        reason: format!("expected a JSON array of strings: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entries_resolves_lines_and_baselines() {
        let entries = vec![
            ConfigEntry::new("active_version_lines", r#"["25.8","25.10"]"#),
            ConfigEntry::new("baseline_25.8", "25.8.2"),
            ConfigEntry::new("baseline_25.10", "25.10.0"),
            ConfigEntry::new("baseline_25.6", "25.6.3"),
            ConfigEntry::new("theme", "dark"),
        ];
        let config = VersionLineConfig::from_entries(&entries).unwrap();

        assert_eq!(config.active_lines, vec!["25.8", "25.10"]);
        assert_eq!(config.baseline("25.8"), Some("25.8.2"));
        assert_eq!(config.baseline("25.6"), Some("25.6.3"));
    }

    #[test]
    fn test_missing_active_lines_is_empty() {
        let config =
            VersionLineConfig::from_entries(&[ConfigEntry::new("baseline_25.8", "25.8.2")]).unwrap();
        assert!(config.active_lines.is_empty());
        assert_eq!(config.baseline("25.8"), Some("25.8.2"));
    }

    #[test]
    fn test_malformed_active_lines_fails_closed() {
        let result =
            VersionLineConfig::from_entries(&[ConfigEntry::new("active_version_lines", "25.8")]);
        assert!(matches!(result, Err(TrackerError::InvalidConfig { .. })));
    }
}
