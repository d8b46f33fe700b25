//! Seed importer orchestration
//!
//! Imports a parsed seed by calling core ops and persisting to SQLite

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, seed_validation, Result};
use crate::repo::SqliteRepo;
use crate::seed::format_v0::SeedV0;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vertrack_core::errors::ExError;
use vertrack_core::model::{
    AuditAction, AuditEntry, Catalog, ConfigEntry, EntityType, PinUpdate, PlanDraft,
};
use vertrack_core::ops::{apply_pin_update, build_manifest, new_plan};
use vertrack_core::rules::validate_config_entry;

/// Counts of what an import wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub plans_created: usize,
    /// Versions already present in the store
    pub plans_skipped: usize,
    pub manifests_created: usize,
    pub pins_set: usize,
    pub config_set: usize,
}

/// Import a seed into the database
///
/// Runs in one transaction:
/// 1. Upserts config entries (validated)
/// 2. Creates each plan whose version is not yet stored, with its manifest
/// 3. Pins regions (by catalog name) to plans (by version)
///
/// Every write appends an audit row attributed to `operator`. Re-importing
/// the same seed creates no duplicate plans.
pub fn import_seed(
    conn: &mut Connection,
    seed: &SeedV0,
    catalog: &Catalog,
    operator: &str,
) -> Result<ImportReport> {
    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut report = ImportReport::default();

    for entry in &seed.config {
        validate_config_entry(&entry.key, &entry.value).map_err(ExError::from)?;
        let old = SqliteRepo::get_config(&tx, &entry.key)?;
        SqliteRepo::upsert_config(&tx, &ConfigEntry::new(&entry.key, &entry.value))?;
        let mut audit = AuditEntry::new(EntityType::Config, &entry.key, AuditAction::Update, operator)
            .with_field("value")
            .with_new_value(&entry.value);
        if let Some(old) = old {
            audit = audit.with_old_value(old.value);
        }
        SqliteRepo::append_audit(&tx, &audit)?;
        report.config_set += 1;
    }

    let mut plan_ids: HashMap<String, String> = HashMap::new();
    for seed_plan in &seed.plans {
        if let Some(existing) = SqliteRepo::get_plan_by_version(&tx, &seed_plan.version)? {
            plan_ids.insert(existing.version.clone(), existing.id);
            report.plans_skipped += 1;
            continue;
        }

        let mut plan = new_plan(PlanDraft {
            version: seed_plan.version.clone(),
            plan_type: seed_plan.plan_type,
            summary: seed_plan.summary.clone(),
            related_requirements: seed_plan.related_requirements.clone(),
            related_bugs: seed_plan.related_bugs.clone(),
        })
        .map_err(ExError::from)?;
        if let Some(status) = seed_plan.status {
            plan.status = status;
        }
        SqliteRepo::insert_plan(&tx, &plan)?;
        SqliteRepo::append_audit(
            &tx,
            &AuditEntry::new(EntityType::Plan, &plan.id, AuditAction::Create, operator)
                .with_new_value(&plan.version),
        )?;
        report.plans_created += 1;

        if let Some(draft) = &seed_plan.manifest {
            let manifest = build_manifest(&plan.id, draft.clone(), catalog).map_err(ExError::from)?;
            SqliteRepo::insert_manifest(&tx, &manifest)?;
            SqliteRepo::append_audit(
                &tx,
                &AuditEntry::new(EntityType::Manifest, &manifest.id, AuditAction::Create, operator)
                    .with_new_value(&manifest.frontend_version),
            )?;
            report.manifests_created += 1;
        }

        plan_ids.insert(plan.version.clone(), plan.id);
    }

    for pin in &seed.pins {
        let region = SqliteRepo::get_region_by_name(&tx, &pin.region)?
            .ok_or_else(|| seed_validation(&format!("Unknown region {}", pin.region)))?;

        let plan_id = match plan_ids.get(&pin.version) {
            Some(id) => id.clone(),
            None => SqliteRepo::get_plan_by_version(&tx, &pin.version)?
                .map(|p| p.id)
                .ok_or_else(|| {
                    seed_validation(&format!(
                        "Pin for {} references unknown version {}",
                        pin.region, pin.version
                    ))
                })?,
        };

        let existing = SqliteRepo::get_pin(&tx, &region.id)?;
        let old_plan_id = existing.as_ref().map(|p| p.plan_id.clone());
        let updated = apply_pin_update(
            &region.id,
            existing,
            PinUpdate {
                plan_id: Some(plan_id.clone()),
                backend_ready: Some(pin.backend_ready),
                frontend_ready: Some(pin.frontend_ready),
            },
        )
        .map_err(ExError::from)?;
        SqliteRepo::upsert_pin(&tx, &updated)?;

        let mut audit = AuditEntry::new(EntityType::Region, &region.id, AuditAction::Update, operator)
            .with_field("version")
            .with_new_value(plan_id);
        if let Some(old) = old_plan_id {
            audit = audit.with_old_value(old);
        }
        SqliteRepo::append_audit(&tx, &audit)?;
        report.pins_set += 1;
    }

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        plans_created = report.plans_created,
        plans_skipped = report.plans_skipped,
        pins_set = report.pins_set,
        "seed imported"
    );
    Ok(report)
}
