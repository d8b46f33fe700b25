//! Plan command handlers with boundary logging.
//!
//! Plans are referenced by id or by version string. Deletion is a soft
//! delete: the status flips to `deprecated` and the row stays readable.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use vertrack_core::errors::{ExError, TrackerError};
use vertrack_core::model::{
    AuditAction, AuditEntry, Catalog, EntityType, ManifestDraft, Plan, PlanDraft, PlanFilter,
    PlanStatus, PlanUpdate,
};
use vertrack_core::ops::{apply_update, build_manifest, deprecate, new_plan, transition_status};
use vertrack_core::queries::filter_plans;
use vertrack_core::{log_op_end, log_op_error, log_op_start};
use vertrack_core_types::OperationContext;
use vertrack_store::errors::{from_rusqlite, Result};
use vertrack_store::SqliteRepo;

use crate::commands::load_plan;
use crate::commands::read_tools::PlanDetail;

/// Create a draft plan, optionally with its manifest
///
/// ## Errors
///
/// - `Validation`: malformed version, type/segment mismatch, blank summary,
///   or an invalid manifest
/// - `Conflict`: the version already exists
/// - `Persistence`: database error
pub fn plan_create(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    draft: PlanDraft,
    manifest: Option<ManifestDraft>,
) -> Result<PlanDetail> {
    log_op_start!("plan_create", version = %draft.version);
    let start = std::time::Instant::now();

    let result = plan_create_impl(conn, ctx, catalog, draft, manifest).map_err(|e| {
        log_op_error!(
            "plan_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "plan_create",
        duration_ms = start.elapsed().as_millis() as u64,
        plan_id = %result.plan.id
    );

    Ok(result)
}

fn plan_create_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    draft: PlanDraft,
    manifest: Option<ManifestDraft>,
) -> Result<PlanDetail> {
    let plan = new_plan(draft).map_err(ExError::from)?;
    let manifest = manifest
        .map(|m| build_manifest(&plan.id, m, catalog))
        .transpose()
        .map_err(ExError::from)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;

    if SqliteRepo::get_plan_by_version(&tx, &plan.version)?.is_some() {
        return Err(TrackerError::VersionExists {
            version: plan.version,
        }
        .into());
    }
    SqliteRepo::insert_plan(&tx, &plan)?;
    SqliteRepo::append_audit(
        &tx,
        &AuditEntry::new(EntityType::Plan, &plan.id, AuditAction::Create, &ctx.operator)
            .with_new_value(&plan.version),
    )?;

    if let Some(manifest) = &manifest {
        SqliteRepo::insert_manifest(&tx, manifest)?;
        SqliteRepo::append_audit(
            &tx,
            &AuditEntry::new(
                EntityType::Manifest,
                &manifest.id,
                AuditAction::Create,
                &ctx.operator,
            )
            .with_new_value(&manifest.frontend_version),
        )?;
    }

    tx.commit().map_err(from_rusqlite)?;

    Ok(PlanDetail {
        plan,
        manifest,
        regions: Vec::new(),
    })
}

/// Get a plan with its manifest and pinned regions
///
/// Deprecated plans are returned like any other.
pub fn plan_get(conn: &Connection, plan_ref: &str) -> Result<PlanDetail> {
    log_op_start!("plan_get", plan_ref = plan_ref);
    let start = std::time::Instant::now();

    let result = plan_get_impl(conn, plan_ref).map_err(|e| {
        log_op_error!(
            "plan_get",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "plan_get",
        duration_ms = start.elapsed().as_millis() as u64
    );

    Ok(result)
}

fn plan_get_impl(conn: &Connection, plan_ref: &str) -> Result<PlanDetail> {
    let plan = load_plan(conn, plan_ref)?;
    let manifest = SqliteRepo::get_manifest_by_plan(conn, &plan.id)?;
    let regions = SqliteRepo::list_regions_for_plan(conn, &plan.id)?;
    Ok(PlanDetail {
        plan,
        manifest,
        regions,
    })
}

/// List plans matching `filter`, newest first
pub fn plan_list(conn: &Connection, filter: &PlanFilter) -> Result<Vec<Plan>> {
    log_op_start!("plan_list");
    let start = std::time::Instant::now();

    let result = SqliteRepo::list_plans(conn)
        .map(|plans| filter_plans(plans, filter))
        .map_err(|e| {
            log_op_error!(
                "plan_list",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "plan_list",
        duration_ms = start.elapsed().as_millis() as u64,
        count = result.len()
    );

    Ok(result)
}

/// Edit summary, requirements and bugs
///
/// Writes one audit row per changed field; an edit that changes nothing
/// writes nothing.
///
/// ## Errors
///
/// - `NotFound`: no plan with that id or version
pub fn plan_update(
    conn: &mut Connection,
    ctx: &OperationContext,
    plan_ref: &str,
    update: PlanUpdate,
) -> Result<Plan> {
    log_op_start!("plan_update", plan_ref = plan_ref);
    let start = std::time::Instant::now();

    let result = plan_update_impl(conn, ctx, plan_ref, update).map_err(|e| {
        log_op_error!(
            "plan_update",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "plan_update",
        duration_ms = start.elapsed().as_millis() as u64,
        plan_id = %result.id
    );

    Ok(result)
}

fn plan_update_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    plan_ref: &str,
    update: PlanUpdate,
) -> Result<Plan> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut plan = load_plan(&tx, plan_ref)?;

    let changes = apply_update(&mut plan, update)?;
    if changes.is_empty() {
        return Ok(plan);
    }

    SqliteRepo::update_plan(&tx, &plan)?;
    for change in changes {
        SqliteRepo::append_audit(
            &tx,
            &AuditEntry::new(EntityType::Plan, &plan.id, AuditAction::Update, &ctx.operator)
                .with_field(change.field)
                .with_old_value(change.old_value)
                .with_new_value(change.new_value),
        )?;
    }

    tx.commit().map_err(from_rusqlite)?;
    Ok(plan)
}

/// Move a plan to another status
///
/// Setting the current status again is a no-op and is not audited.
///
/// ## Errors
///
/// - `Validation`: the plan is deprecated
/// - `NotFound`: no plan with that id or version
pub fn plan_set_status(
    conn: &mut Connection,
    ctx: &OperationContext,
    plan_ref: &str,
    status: PlanStatus,
) -> Result<Plan> {
    log_op_start!("plan_set_status", plan_ref = plan_ref, status = status.as_str());
    let start = std::time::Instant::now();

    let result = change_status(conn, ctx, plan_ref, status, AuditAction::StatusChange).map_err(
        |e| {
            log_op_error!(
                "plan_set_status",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        },
    )?;

    log_op_end!(
        "plan_set_status",
        duration_ms = start.elapsed().as_millis() as u64,
        plan_id = %result.id
    );

    Ok(result)
}

/// Soft-delete a plan by flipping its status to `deprecated`
///
/// Version, manifest and region pins are left untouched.
pub fn plan_deprecate(
    conn: &mut Connection,
    ctx: &OperationContext,
    plan_ref: &str,
) -> Result<Plan> {
    log_op_start!("plan_deprecate", plan_ref = plan_ref);
    let start = std::time::Instant::now();

    let result = change_status(
        conn,
        ctx,
        plan_ref,
        PlanStatus::Deprecated,
        AuditAction::Delete,
    )
    .map_err(|e| {
        log_op_error!(
            "plan_deprecate",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "plan_deprecate",
        duration_ms = start.elapsed().as_millis() as u64,
        plan_id = %result.id
    );

    Ok(result)
}

fn change_status(
    conn: &mut Connection,
    ctx: &OperationContext,
    plan_ref: &str,
    target: PlanStatus,
    action: AuditAction,
) -> Result<Plan> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut plan = load_plan(&tx, plan_ref)?;

    let previous = if target == PlanStatus::Deprecated {
        deprecate(&mut plan)
    } else {
        transition_status(&mut plan, target)
    }
    .map_err(ExError::from)?;

    if previous == plan.status {
        return Ok(plan);
    }

    SqliteRepo::update_plan(&tx, &plan)?;
    SqliteRepo::append_audit(
        &tx,
        &AuditEntry::new(EntityType::Plan, &plan.id, action, &ctx.operator)
            .with_field("status")
            .with_old_value(previous.as_str())
            .with_new_value(plan.status.as_str()),
    )?;

    tx.commit().map_err(from_rusqlite)?;
    Ok(plan)
}
