//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for every operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.
//!
//! Mutating commands take `&mut Connection` and write their changes and the
//! matching audit rows in one transaction.

#![allow(clippy::result_large_err)]

pub mod config;
pub mod dashboard;
pub mod engine_command;
pub mod engine_query;
pub mod manifest;
pub mod plan;
pub mod read_tools;
pub mod region;
pub mod seed;

use rusqlite::Connection;
use serde::Serialize;
use vertrack_core::errors::{ExError, ExErrorKind, TrackerError};
use vertrack_core::model::{Plan, Region, VersionLineConfig};
use vertrack_store::errors::Result;
use vertrack_store::SqliteRepo;

/// Resolve a plan by id, falling back to its version string
pub(crate) fn load_plan(conn: &Connection, reference: &str) -> Result<Plan> {
    if let Some(plan) = SqliteRepo::get_plan(conn, reference)? {
        return Ok(plan);
    }
    SqliteRepo::get_plan_by_version(conn, reference)?.ok_or_else(|| {
        TrackerError::PlanNotFound {
            plan_id: reference.to_string(),
        }
        .into()
    })
}

/// Resolve a region by id, falling back to its name
pub(crate) fn load_region(conn: &Connection, reference: &str) -> Result<Region> {
    if let Some(region) = SqliteRepo::get_region(conn, reference)? {
        return Ok(region);
    }
    SqliteRepo::get_region_by_name(conn, reference)?.ok_or_else(|| {
        TrackerError::RegionNotFound {
            region_id: reference.to_string(),
        }
        .into()
    })
}

/// Current version-line config; malformed entries fail the read
pub(crate) fn load_line_config(conn: &Connection) -> Result<VersionLineConfig> {
    let entries = SqliteRepo::list_config(conn)?;
    VersionLineConfig::from_entries(&entries).map_err(ExError::from)
}

/// JSON text stored in an audit row's old/new value
pub(crate) fn audit_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("audit_json")
            .with_message(e.to_string())
    })
}
