//! Manifest command handlers with boundary logging.
//!
//! A plan has at most one manifest. Component edits replace the whole set
//! inside the same transaction as the header update and its audit row.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use serde_json::json;
use vertrack_core::diff::{diff_manifests, diff_plan_info, PlanComparison, PlanRef};
use vertrack_core::errors::{ExError, TrackerError};
use vertrack_core::model::{
    AuditAction, AuditEntry, Catalog, EntityType, Manifest, ManifestDraft, ManifestPatch,
    PlanType,
};
use vertrack_core::ops::{apply_patch, build_manifest, copy_manifest, copy_plan_draft, new_plan};
use vertrack_core::{log_op_end, log_op_error, log_op_start};
use vertrack_core_types::OperationContext;
use vertrack_store::errors::{from_rusqlite, Result};
use vertrack_store::SqliteRepo;

use crate::commands::read_tools::PlanDetail;
use crate::commands::{audit_json, load_plan};

/// Get the manifest of a plan
///
/// ## Errors
///
/// - `NotFound`: unknown plan, or the plan has no manifest
pub fn manifest_get(conn: &Connection, plan_ref: &str) -> Result<Manifest> {
    log_op_start!("manifest_get", plan_ref = plan_ref);
    let start = std::time::Instant::now();

    let result = load_manifest(conn, plan_ref).map_err(|e| {
        log_op_error!(
            "manifest_get",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "manifest_get",
        duration_ms = start.elapsed().as_millis() as u64,
        manifest_id = %result.id
    );

    Ok(result)
}

fn load_manifest(conn: &Connection, plan_ref: &str) -> Result<Manifest> {
    let plan = load_plan(conn, plan_ref)?;
    SqliteRepo::get_manifest_by_plan(conn, &plan.id)?.ok_or_else(|| {
        TrackerError::ManifestNotFound {
            plan_id: plan.id.clone(),
        }
        .into()
    })
}

/// Attach a manifest to a plan that has none
///
/// ## Errors
///
/// - `Validation`: blank frontend version, duplicate or unknown component
/// - `NotFound`: unknown plan
/// - `Conflict`: the plan already has a manifest
pub fn manifest_create(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    plan_ref: &str,
    draft: ManifestDraft,
) -> Result<Manifest> {
    log_op_start!("manifest_create", plan_ref = plan_ref);
    let start = std::time::Instant::now();

    let result = manifest_create_impl(conn, ctx, catalog, plan_ref, draft).map_err(|e| {
        log_op_error!(
            "manifest_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "manifest_create",
        duration_ms = start.elapsed().as_millis() as u64,
        manifest_id = %result.id
    );

    Ok(result)
}

fn manifest_create_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    plan_ref: &str,
    draft: ManifestDraft,
) -> Result<Manifest> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let plan = load_plan(&tx, plan_ref)?;

    if SqliteRepo::get_manifest_by_plan(&tx, &plan.id)?.is_some() {
        return Err(TrackerError::ManifestExists { plan_id: plan.id }.into());
    }

    let manifest = build_manifest(&plan.id, draft, catalog).map_err(ExError::from)?;
    SqliteRepo::insert_manifest(&tx, &manifest)?;
    SqliteRepo::append_audit(
        &tx,
        &AuditEntry::new(
            EntityType::Manifest,
            &manifest.id,
            AuditAction::Create,
            &ctx.operator,
        )
        .with_new_value(audit_json(&json!({
            "plan_id": plan.id,
            "frontend_version": manifest.frontend_version,
        }))?),
    )?;

    tx.commit().map_err(from_rusqlite)?;
    Ok(manifest)
}

/// Edit a manifest's header and, optionally, replace its component set
///
/// The audit row carries the manifest before and after the edit as JSON.
///
/// ## Errors
///
/// - `Validation`: invalid patch
/// - `NotFound`: unknown plan, or the plan has no manifest
pub fn manifest_update(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    plan_ref: &str,
    patch: ManifestPatch,
) -> Result<Manifest> {
    log_op_start!("manifest_update", plan_ref = plan_ref);
    let start = std::time::Instant::now();

    let result = manifest_update_impl(conn, ctx, catalog, plan_ref, patch).map_err(|e| {
        log_op_error!(
            "manifest_update",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "manifest_update",
        duration_ms = start.elapsed().as_millis() as u64,
        manifest_id = %result.id,
        components = result.components.len()
    );

    Ok(result)
}

fn manifest_update_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
    plan_ref: &str,
    patch: ManifestPatch,
) -> Result<Manifest> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut manifest = load_manifest(&tx, plan_ref)?;
    let before = manifest.clone();

    let replaced = apply_patch(&mut manifest, patch, catalog).map_err(ExError::from)?;
    SqliteRepo::update_manifest_header(&tx, &manifest)?;
    if replaced {
        SqliteRepo::replace_components(&tx, &manifest.id, &manifest.components)?;
    }
    // Reload so the returned components carry storage order
    let manifest = SqliteRepo::get_manifest_by_plan(&tx, &manifest.plan_id)?.ok_or_else(|| {
        ExError::from(TrackerError::ManifestNotFound {
            plan_id: manifest.plan_id.clone(),
        })
    })?;

    SqliteRepo::append_audit(
        &tx,
        &AuditEntry::new(
            EntityType::Manifest,
            &manifest.id,
            AuditAction::Update,
            &ctx.operator,
        )
        .with_old_value(audit_json(&before)?)
        .with_new_value(audit_json(&manifest)?),
    )?;

    tx.commit().map_err(from_rusqlite)?;
    Ok(manifest)
}

/// Create a new draft plan whose manifest copies `source_ref`'s
///
/// Component and frontend versions carry over with change types reset to
/// `unchanged`. The summary defaults to `Copied from <source version>`.
///
/// ## Errors
///
/// - `Validation`: malformed new version
/// - `NotFound`: unknown source plan, or it has no manifest
/// - `Conflict`: the new version already exists
pub fn manifest_copy(
    conn: &mut Connection,
    ctx: &OperationContext,
    source_ref: &str,
    new_version: &str,
    plan_type: Option<PlanType>,
    summary: Option<String>,
) -> Result<PlanDetail> {
    log_op_start!(
        "manifest_copy",
        source_ref = source_ref,
        new_version = new_version
    );
    let start = std::time::Instant::now();

    let result = manifest_copy_impl(conn, ctx, source_ref, new_version, plan_type, summary)
        .map_err(|e| {
            log_op_error!(
                "manifest_copy",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "manifest_copy",
        duration_ms = start.elapsed().as_millis() as u64,
        plan_id = %result.plan.id
    );

    Ok(result)
}

fn manifest_copy_impl(
    conn: &mut Connection,
    ctx: &OperationContext,
    source_ref: &str,
    new_version: &str,
    plan_type: Option<PlanType>,
    summary: Option<String>,
) -> Result<PlanDetail> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let source_plan = load_plan(&tx, source_ref)?;
    let source_manifest = SqliteRepo::get_manifest_by_plan(&tx, &source_plan.id)?.ok_or_else(
        || {
            ExError::from(TrackerError::ManifestNotFound {
                plan_id: source_plan.id.clone(),
            })
        },
    )?;

    let draft = copy_plan_draft(&source_plan, new_version, plan_type, summary);
    let plan = new_plan(draft).map_err(ExError::from)?;
    if SqliteRepo::get_plan_by_version(&tx, &plan.version)?.is_some() {
        return Err(TrackerError::VersionExists {
            version: plan.version,
        }
        .into());
    }
    let manifest = copy_manifest(&source_manifest, &plan.id);

    SqliteRepo::insert_plan(&tx, &plan)?;
    SqliteRepo::insert_manifest(&tx, &manifest)?;
    SqliteRepo::append_audit(
        &tx,
        &AuditEntry::new(EntityType::Plan, &plan.id, AuditAction::Create, &ctx.operator)
            .with_new_value(audit_json(&json!({ "copied_from": source_plan.id }))?),
    )?;
    SqliteRepo::append_audit(
        &tx,
        &AuditEntry::new(
            EntityType::Manifest,
            &manifest.id,
            AuditAction::Create,
            &ctx.operator,
        )
        .with_new_value(audit_json(&json!({
            "plan_id": plan.id,
            "frontend_version": manifest.frontend_version,
        }))?),
    )?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(PlanDetail {
        plan,
        manifest: Some(manifest),
        regions: Vec::new(),
    })
}

/// Compare two plans: basic-info fields and manifests
///
/// ## Errors
///
/// - `NotFound`: either plan is unknown or lacks a manifest
pub fn plans_compare(
    conn: &Connection,
    plan_a_ref: &str,
    plan_b_ref: &str,
) -> Result<PlanComparison> {
    log_op_start!("plans_compare", plan_a = plan_a_ref, plan_b = plan_b_ref);
    let start = std::time::Instant::now();

    let result = plans_compare_impl(conn, plan_a_ref, plan_b_ref).map_err(|e| {
        log_op_error!(
            "plans_compare",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "plans_compare",
        duration_ms = start.elapsed().as_millis() as u64,
        total_changes = result.manifest_diff.total_changes
    );

    Ok(result)
}

fn plans_compare_impl(
    conn: &Connection,
    plan_a_ref: &str,
    plan_b_ref: &str,
) -> Result<PlanComparison> {
    let plan_a = load_plan(conn, plan_a_ref)?;
    let plan_b = load_plan(conn, plan_b_ref)?;
    let manifest_a = load_manifest(conn, &plan_a.id)?;
    let manifest_b = load_manifest(conn, &plan_b.id)?;

    Ok(PlanComparison {
        plan_a: PlanRef::from(&plan_a),
        plan_b: PlanRef::from(&plan_b),
        basic_info_changes: diff_plan_info(&plan_a, &plan_b),
        manifest_diff: diff_manifests(&manifest_a, &manifest_b),
    })
}
