//! Dashboard query with boundary logging.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use vertrack_core::dashboard::{aggregate, Dashboard, RECENT_LOGS_LIMIT};
use vertrack_core::{log_op_end, log_op_error, log_op_start};
use vertrack_store::errors::Result;
use vertrack_store::SqliteRepo;

use crate::commands::load_line_config;

/// Aggregate plan and alignment statistics plus the latest audit entries
///
/// ## Errors
///
/// - `Validation`: stored version-line config is malformed
/// - `Persistence`: database error
pub fn dashboard(conn: &Connection) -> Result<Dashboard> {
    log_op_start!("dashboard");
    let start = std::time::Instant::now();

    let result = dashboard_impl(conn).map_err(|e| {
        log_op_error!(
            "dashboard",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "dashboard",
        duration_ms = start.elapsed().as_millis() as u64,
        version_lines = result.version_lines.len()
    );

    Ok(result)
}

fn dashboard_impl(conn: &Connection) -> Result<Dashboard> {
    let plans = SqliteRepo::list_plans(conn)?;
    let regions = SqliteRepo::list_regions(conn, None)?;
    let pins = SqliteRepo::list_pins(conn)?;
    let config = load_line_config(conn)?;

    let mut dashboard = aggregate(&plans, &regions, &pins, &config);
    dashboard.recent_logs = SqliteRepo::list_recent_audit(conn, RECENT_LOGS_LIMIT)?;
    Ok(dashboard)
}
