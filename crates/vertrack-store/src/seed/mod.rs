//! Seed import system
//!
//! Provides:
//! - The embedded component/region catalog and its parser
//! - Seed Format v0 schema for plans, manifests, pins and config
//! - YAML parser with validation
//! - Importer orchestration

pub mod catalog;
pub mod format_v0;
pub mod importer;
pub mod parser;

pub use catalog::{default_catalog, parse_catalog_file, parse_catalog_str, seed_regions};
pub use format_v0::SeedV0;
pub use importer::{import_seed, ImportReport};
pub use parser::{parse_seed_file, parse_seed_str};
