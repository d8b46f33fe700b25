//! Engine-level mutation surface.
//!
//! `apply_engine_command` is the single entry point for every write. Each
//! variant maps onto one command handler, which owns its transaction, audit
//! rows and lifecycle logging.

#![allow(clippy::result_large_err)]

use std::path::PathBuf;

use rusqlite::Connection;
use serde::Serialize;
use vertrack_core::model::{
    Catalog, ConfigEntry, Manifest, ManifestDraft, ManifestPatch, PinUpdate, Plan, PlanDraft,
    PlanStatus, PlanType, PlanUpdate, RegionVersion,
};
use vertrack_core_types::OperationContext;
use vertrack_store::errors::Result;
use vertrack_store::seed::ImportReport;

use crate::commands::read_tools::PlanDetail;
use crate::commands::{config, manifest, plan, region, seed};

/// Mutations supported by the engine
#[derive(Debug, Clone)]
pub enum EngineCommand {
    // ── Plan ─────────────────────────────────────────────────────────────────
    PlanCreate {
        draft: PlanDraft,
        manifest: Option<ManifestDraft>,
    },
    PlanUpdate {
        plan_ref: String,
        update: PlanUpdate,
    },
    PlanSetStatus {
        plan_ref: String,
        status: PlanStatus,
    },
    /// Soft delete
    PlanDeprecate { plan_ref: String },

    // ── Manifest ─────────────────────────────────────────────────────────────
    ManifestCreate {
        plan_ref: String,
        draft: ManifestDraft,
    },
    ManifestUpdate {
        plan_ref: String,
        patch: ManifestPatch,
    },
    /// New draft plan carrying a copy of the source manifest
    ManifestCopy {
        source_ref: String,
        new_version: String,
        plan_type: Option<PlanType>,
        summary: Option<String>,
    },

    // ── Region / Config ──────────────────────────────────────────────────────
    RegionSetVersion {
        region_ref: String,
        update: PinUpdate,
    },
    ConfigUpsert { key: String, value: String },

    // ── Seed ─────────────────────────────────────────────────────────────────
    SeedCatalog,
    SeedImport { path: PathBuf },
}

/// Result of applying an engine command
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EngineCommandResult {
    PlanDetail(PlanDetail),
    Plan(Plan),
    Manifest(Manifest),
    RegionVersion(RegionVersion),
    ConfigEntry(ConfigEntry),
    RegionsSeeded { regions: usize },
    Import(ImportReport),
}

/// Apply an engine command on behalf of `ctx.operator`
///
/// A failure carries `ctx.request_id` so callers can correlate it with the
/// boundary log lines of the same request.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    ctx: &OperationContext,
    catalog: &Catalog,
) -> Result<EngineCommandResult> {
    tracing::debug!(request_id = %ctx.request_id, "apply_engine_command");

    let result = match cmd {
        EngineCommand::PlanCreate { draft, manifest } => {
            plan::plan_create(conn, ctx, catalog, draft, manifest)
                .map(EngineCommandResult::PlanDetail)
        }
        EngineCommand::PlanUpdate { plan_ref, update } => {
            plan::plan_update(conn, ctx, &plan_ref, update).map(EngineCommandResult::Plan)
        }
        EngineCommand::PlanSetStatus { plan_ref, status } => {
            plan::plan_set_status(conn, ctx, &plan_ref, status).map(EngineCommandResult::Plan)
        }
        EngineCommand::PlanDeprecate { plan_ref } => {
            plan::plan_deprecate(conn, ctx, &plan_ref).map(EngineCommandResult::Plan)
        }
        EngineCommand::ManifestCreate { plan_ref, draft } => {
            manifest::manifest_create(conn, ctx, catalog, &plan_ref, draft)
                .map(EngineCommandResult::Manifest)
        }
        EngineCommand::ManifestUpdate { plan_ref, patch } => {
            manifest::manifest_update(conn, ctx, catalog, &plan_ref, patch)
                .map(EngineCommandResult::Manifest)
        }
        EngineCommand::ManifestCopy {
            source_ref,
            new_version,
            plan_type,
            summary,
        } => manifest::manifest_copy(conn, ctx, &source_ref, &new_version, plan_type, summary)
            .map(EngineCommandResult::PlanDetail),
        EngineCommand::RegionSetVersion { region_ref, update } => {
            region::region_set_version(conn, ctx, &region_ref, update)
                .map(EngineCommandResult::RegionVersion)
        }
        EngineCommand::ConfigUpsert { key, value } => {
            config::config_upsert(conn, ctx, &key, &value).map(EngineCommandResult::ConfigEntry)
        }
        EngineCommand::SeedCatalog => seed::seed_catalog(conn, catalog)
            .map(|regions| EngineCommandResult::RegionsSeeded { regions }),
        EngineCommand::SeedImport { path } => {
            seed::import_seed(conn, ctx, catalog, &path).map(EngineCommandResult::Import)
        }
    };
    result.map_err(|e| e.with_request_id(ctx.request_id.clone()))
}
