//! Seed parser with validation
//!
//! Parses YAML and validates schema version, version uniqueness and pin references

#![allow(clippy::result_large_err)]

use crate::errors::{seed_validation, Result};
use crate::seed::format_v0::SeedV0;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    let content = fs::read_to_string(path)
        .map_err(|e| seed_validation(&format!("Failed to read seed file: {}", e)))?;

    parse_seed_str(&content)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed)?;

    Ok(seed)
}

/// Structural checks that need no database
///
/// Pins may reference versions outside this seed; those are resolved
/// against the store at import time.
fn validate_seed(seed: &SeedV0) -> Result<()> {
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    let mut versions = HashSet::new();
    for plan in &seed.plans {
        if !versions.insert(plan.version.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate plan version {}",
                plan.version
            )));
        }
    }

    let mut pinned = HashSet::new();
    for pin in &seed.pins {
        if !pinned.insert(pin.region.as_str()) {
            return Err(seed_validation(&format!(
                "Region {} is pinned more than once",
                pin.region
            )));
        }
    }

    let mut keys = HashSet::new();
    for entry in &seed.config {
        if !keys.insert(entry.key.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate config key {}",
                entry.key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_schema_version() {
        let err = parse_seed_str("schema_version: 2\n").unwrap_err();
        assert!(err.message().contains("schema_version"));
    }

    #[test]
    fn test_rejects_duplicate_versions() {
        let yaml = r#"
schema_version: 0
plans:
  - { version: "25.8.0", summary: a }
  - { version: "25.8.0", summary: b }
"#;
        let err = parse_seed_str(yaml).unwrap_err();
        assert!(err.message().contains("Duplicate plan version"));
    }

    #[test]
    fn test_minimal_seed() {
        let seed = parse_seed_str("schema_version: 0\n").unwrap();
        assert!(seed.plans.is_empty());
        assert!(seed.pins.is_empty());
    }
}
