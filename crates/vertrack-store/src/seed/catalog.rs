//! Component and region catalog
//!
//! The default catalog is embedded at compile time; a replacement can be
//! loaded from any YAML file of the same shape.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, seed_validation, Result};
use crate::repo::SqliteRepo;
use rusqlite::Connection;
use std::path::Path;
use uuid::Uuid;
use vertrack_core::errors::ExError;
use vertrack_core::model::Catalog;

const DEFAULT_CATALOG: &str = include_str!("../../catalog/default_catalog.yaml");

/// The embedded default catalog
pub fn default_catalog() -> Result<Catalog> {
    parse_catalog_str(DEFAULT_CATALOG)
}

/// Parse and validate a catalog document
pub fn parse_catalog_str(content: &str) -> Result<Catalog> {
    let catalog: Catalog = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("Catalog parse error: {}", e)))?;
    catalog.validate().map_err(ExError::from)?;
    Ok(catalog)
}

pub fn parse_catalog_file(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error("read_catalog", e))?;
    parse_catalog_str(&content)
}

/// Upsert every catalog region by name
///
/// Existing regions keep their id and pin; area and gray flag are refreshed.
/// Returns the number of regions written.
pub fn seed_regions(conn: &Connection, catalog: &Catalog) -> Result<usize> {
    for region in &catalog.regions {
        SqliteRepo::upsert_region_seed(conn, region, &Uuid::now_v7().to_string())?;
    }
    tracing::debug!(regions = catalog.regions.len(), "catalog regions seeded");
    Ok(catalog.regions.len())
}
