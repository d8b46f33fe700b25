//! Vertrack Store - SQLite persistence and seed import
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - Repository layer mapping plans, manifests, regions, config and audit rows
//! - Embedded component/region catalog and YAML seed data import

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteRepo;
