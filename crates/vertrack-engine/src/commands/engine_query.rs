//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for all read-only queries.
//! Unlike `apply_engine_command`, it accepts a shared connection and never
//! writes to the database.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use serde::Serialize;
use vertrack_core::dashboard::Dashboard;
use vertrack_core::diff::{render_human_summary, PlanComparison};
use vertrack_core::model::{ConfigEntry, Manifest, Plan, PlanFilter, RegionArea};
use vertrack_store::errors::Result;

use crate::commands::read_tools::{PlanDetail, RegionStatus};
use crate::commands::{config, dashboard, manifest, plan, region};

/// The structured and rendered result of a plan comparison
#[derive(Debug, Clone, Serialize)]
pub struct PlanCompareResult {
    #[serde(flatten)]
    pub comparison: PlanComparison,
    /// Markdown rendering of `comparison`
    pub human_summary: String,
}

/// Read-only queries supported by the engine
#[derive(Debug, Clone)]
pub enum EngineQuery {
    // ── Plan ─────────────────────────────────────────────────────────────────
    PlanGet { plan_ref: String },
    PlanList(PlanFilter),
    /// Basic-info and manifest diff of two plans
    PlansCompare { plan_a: String, plan_b: String },

    // ── Manifest ─────────────────────────────────────────────────────────────
    ManifestGet { plan_ref: String },

    // ── Region ───────────────────────────────────────────────────────────────
    RegionList { area: Option<RegionArea> },
    RegionGet { region_ref: String },

    // ── Config / Dashboard ───────────────────────────────────────────────────
    ConfigList,
    Dashboard,
}

/// Result of a read-only engine query
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EngineQueryResult {
    PlanDetail(PlanDetail),
    Plans(Vec<Plan>),
    Compare(PlanCompareResult),
    Manifest(Manifest),
    Regions(Vec<RegionStatus>),
    Region(RegionStatus),
    Config(Vec<ConfigEntry>),
    Dashboard(Dashboard),
}

/// Apply a read-only engine query
pub fn apply_engine_query(query: EngineQuery, conn: &Connection) -> Result<EngineQueryResult> {
    match query {
        EngineQuery::PlanGet { plan_ref } => {
            plan::plan_get(conn, &plan_ref).map(EngineQueryResult::PlanDetail)
        }
        EngineQuery::PlanList(filter) => {
            plan::plan_list(conn, &filter).map(EngineQueryResult::Plans)
        }
        EngineQuery::PlansCompare { plan_a, plan_b } => {
            let comparison = manifest::plans_compare(conn, &plan_a, &plan_b)?;
            let human_summary = render_human_summary(&comparison);
            Ok(EngineQueryResult::Compare(PlanCompareResult {
                comparison,
                human_summary,
            }))
        }
        EngineQuery::ManifestGet { plan_ref } => {
            manifest::manifest_get(conn, &plan_ref).map(EngineQueryResult::Manifest)
        }
        EngineQuery::RegionList { area } => {
            region::region_list(conn, area).map(EngineQueryResult::Regions)
        }
        EngineQuery::RegionGet { region_ref } => {
            region::region_get(conn, &region_ref).map(EngineQueryResult::Region)
        }
        EngineQuery::ConfigList => config::config_list(conn).map(EngineQueryResult::Config),
        EngineQuery::Dashboard => dashboard::dashboard(conn).map(EngineQueryResult::Dashboard),
    }
}
