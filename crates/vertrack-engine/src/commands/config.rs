//! System config command handlers.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use vertrack_core::errors::ExError;
use vertrack_core::model::{AuditAction, AuditEntry, ConfigEntry, EntityType};
use vertrack_core::rules::validate_config_entry;
use vertrack_core::{log_op_end, log_op_error, log_op_start};
use vertrack_core_types::OperationContext;
use vertrack_store::errors::{from_rusqlite, Result};
use vertrack_store::SqliteRepo;

/// All config entries ordered by key
pub fn config_list(conn: &Connection) -> Result<Vec<ConfigEntry>> {
    log_op_start!("config_list");
    let start = std::time::Instant::now();

    let result = SqliteRepo::list_config(conn).map_err(|e| {
        log_op_error!(
            "config_list",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "config_list",
        duration_ms = start.elapsed().as_millis() as u64,
        count = result.len()
    );

    Ok(result)
}

/// Insert or overwrite a config entry
///
/// ## Errors
///
/// - `Validation`: blank key or value, a malformed `active_version_lines`
///   array, or a baseline that is not a version on its line
pub fn config_upsert(
    conn: &mut Connection,
    ctx: &OperationContext,
    key: &str,
    value: &str,
) -> Result<ConfigEntry> {
    log_op_start!("config_upsert", key = key);
    let start = std::time::Instant::now();

    let result = config_upsert_impl(conn, ctx, key, value).map_err(|e| {
        log_op_error!(
            "config_upsert",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            key = key
        );
        e
    })?;

    log_op_end!(
        "config_upsert",
        duration_ms = start.elapsed().as_millis() as u64,
        key = key
    );

    Ok(result)
}

fn config_upsert_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    key: &str,
    value: &str,
) -> Result<ConfigEntry> {
    let key = key.trim();
    let value = value.trim();
    validate_config_entry(key, value).map_err(ExError::from)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let previous = SqliteRepo::get_config(&tx, key)?;
    let entry = ConfigEntry::new(key, value);
    SqliteRepo::upsert_config(&tx, &entry)?;

    let mut audit = AuditEntry::new(EntityType::Config, key, AuditAction::Update, &ctx.operator)
        .with_field("value")
        .with_new_value(value);
    if let Some(previous) = previous {
        audit = audit.with_old_value(previous.value);
    }
    SqliteRepo::append_audit(&tx, &audit)?;

    tx.commit().map_err(from_rusqlite)?;
    Ok(entry)
}
