//! Region command handlers with boundary logging.
//!
//! Regions are referenced by id or by name.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use rusqlite::Connection;
use vertrack_core::dashboard::region_drift;
use vertrack_core::errors::{ExError, TrackerError};
use vertrack_core::model::{
    AuditAction, AuditEntry, EntityType, PinUpdate, Plan, Region, RegionArea, RegionVersion,
};
use vertrack_core::ops::apply_pin_update;
use vertrack_core::{log_op_end, log_op_error, log_op_start};
use vertrack_core_types::OperationContext;
use vertrack_store::errors::{from_rusqlite, Result};
use vertrack_store::SqliteRepo;

use crate::commands::read_tools::RegionStatus;
use crate::commands::{load_line_config, load_plan, load_region};

/// List regions ordered by area then name, each with pin, plan and drift
pub fn region_list(conn: &Connection, area: Option<RegionArea>) -> Result<Vec<RegionStatus>> {
    log_op_start!("region_list", area = area.map(|a| a.as_str()));
    let start = std::time::Instant::now();

    let result = SqliteRepo::list_regions(conn, area)
        .and_then(|regions| region_statuses(conn, regions))
        .map_err(|e| {
            log_op_error!(
                "region_list",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "region_list",
        duration_ms = start.elapsed().as_millis() as u64,
        count = result.len()
    );

    Ok(result)
}

/// Get one region with its pin, plan and drift
///
/// ## Errors
///
/// - `NotFound`: no region with that id or name
pub fn region_get(conn: &Connection, region_ref: &str) -> Result<RegionStatus> {
    log_op_start!("region_get", region_ref = region_ref);
    let start = std::time::Instant::now();

    let result = region_get_impl(conn, region_ref).map_err(|e| {
        log_op_error!(
            "region_get",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "region_get",
        duration_ms = start.elapsed().as_millis() as u64,
        region_id = %result.region.id
    );

    Ok(result)
}

fn region_get_impl(conn: &Connection, region_ref: &str) -> Result<RegionStatus> {
    let region = load_region(conn, region_ref)?;
    let region_id = region.id.clone();
    region_statuses(conn, vec![region])?
        .pop()
        .ok_or_else(|| TrackerError::RegionNotFound { region_id }.into())
}

fn region_statuses(conn: &Connection, regions: Vec<Region>) -> Result<Vec<RegionStatus>> {
    let plans = SqliteRepo::list_plans(conn)?;
    let pins = SqliteRepo::list_pins(conn)?;
    let config = load_line_config(conn)?;

    let drifts = region_drift(&plans, &regions, &pins, &config);
    let drift_by_region: HashMap<&str, _> =
        drifts.iter().map(|d| (d.region_id.as_str(), d)).collect();
    let plans_by_id: HashMap<&str, &Plan> = plans.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut pins_by_region: HashMap<String, RegionVersion> = pins
        .into_iter()
        .map(|pin| (pin.region_id.clone(), pin))
        .collect();

    Ok(regions
        .into_iter()
        .map(|region| {
            let pin = pins_by_region.remove(&region.id);
            let plan = pin
                .as_ref()
                .and_then(|p| plans_by_id.get(p.plan_id.as_str()).copied());
            let drift = drift_by_region.get(region.id.as_str()).copied();
            RegionStatus::new(region, pin, plan, drift)
        })
        .collect())
}

/// Create or update a region's pin
///
/// `update.plan_id` accepts a plan id or version. Readiness flags left unset
/// keep their value. Always appends one audit row with `field = version`
/// holding the old and new plan ids.
///
/// ## Errors
///
/// - `NotFound`: unknown region or plan
/// - `Validation`: a region without a pin and no plan supplied
pub fn region_set_version(
    conn: &mut Connection,
    ctx: &OperationContext,
    region_ref: &str,
    update: PinUpdate,
) -> Result<RegionVersion> {
    log_op_start!("region_set_version", region_ref = region_ref);
    let start = std::time::Instant::now();

    let result = region_set_version_impl(conn, ctx, region_ref, update).map_err(|e| {
        log_op_error!(
            "region_set_version",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "region_set_version",
        duration_ms = start.elapsed().as_millis() as u64,
        region_id = %result.region_id,
        plan_id = %result.plan_id
    );

    Ok(result)
}

fn region_set_version_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    region_ref: &str,
    mut update: PinUpdate,
) -> Result<RegionVersion> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let region = load_region(&tx, region_ref)?;

    if let Some(plan_ref) = update.plan_id.clone().filter(|r| !r.trim().is_empty()) {
        update.plan_id = Some(load_plan(&tx, &plan_ref)?.id);
    }

    let existing = SqliteRepo::get_pin(&tx, &region.id)?;
    let old_plan_id = existing.as_ref().map(|p| p.plan_id.clone());
    let pin = apply_pin_update(&region.id, existing, update).map_err(ExError::from)?;
    SqliteRepo::upsert_pin(&tx, &pin)?;

    let mut audit = AuditEntry::new(
        EntityType::Region,
        &region.id,
        AuditAction::Update,
        &ctx.operator,
    )
    .with_field("version")
    .with_new_value(&pin.plan_id);
    if let Some(old) = old_plan_id {
        audit = audit.with_old_value(old);
    }
    SqliteRepo::append_audit(&tx, &audit)?;

    tx.commit().map_err(from_rusqlite)?;
    Ok(pin)
}
