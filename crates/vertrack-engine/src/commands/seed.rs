//! Catalog seeding and YAML data import.

#![allow(clippy::result_large_err)]

use std::path::Path;

use rusqlite::Connection;
use vertrack_core::model::Catalog;
use vertrack_core::{log_op_end, log_op_error, log_op_start};
use vertrack_core_types::OperationContext;
use vertrack_store::errors::{from_rusqlite, Result};
use vertrack_store::seed::{self, ImportReport};

/// Upsert every catalog region by name
///
/// Returns the number of regions written. Existing pins are untouched.
pub fn seed_catalog(conn: &mut Connection, catalog: &Catalog) -> Result<usize> {
    log_op_start!("seed_catalog", regions = catalog.regions.len());
    let start = std::time::Instant::now();

    let result = seed_catalog_impl(conn, catalog).map_err(|e| {
        log_op_error!(
            "seed_catalog",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "seed_catalog",
        duration_ms = start.elapsed().as_millis() as u64,
        count = result
    );

    Ok(result)
}

fn seed_catalog_impl(conn: &mut Connection, catalog: &Catalog) -> Result<usize> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let count = seed::seed_regions(&tx, catalog)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(count)
}

/// Import a seed file of plans, manifests, pins and config
///
/// Regions named by pins must already exist (see [`seed_catalog`]). The
/// whole file is applied in one transaction; plans whose version is already
/// stored are skipped.
///
/// ## Errors
///
/// - `Validation`: malformed YAML, duplicate entries, unknown region,
///   component or version, invalid config
pub fn import_seed(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    path: &Path,
) -> Result<ImportReport> {
    log_op_start!("import_seed", path = %path.display());
    let start = std::time::Instant::now();

    let result = seed::parse_seed_file(path)
        .and_then(|parsed| seed::import_seed(conn, &parsed, catalog, &ctx.operator))
        .map_err(|e| {
            log_op_error!(
                "import_seed",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "import_seed",
        duration_ms = start.elapsed().as_millis() as u64,
        plans_created = result.plans_created,
        pins_set = result.pins_set
    );

    Ok(result)
}
