//! Result types for the read side of the engine.
//!
//! Plain data containers assembled from several repository reads; no I/O or
//! mutation happens here.

use serde::{Deserialize, Serialize};
use vertrack_core::dashboard::{PlanSummary, RegionDrift};
use vertrack_core::model::{Manifest, Plan, Region, RegionVersion};
use vertrack_core::version::Drift;

/// A plan with its manifest and the regions currently pinned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: Plan,
    pub manifest: Option<Manifest>,
    pub regions: Vec<Region>,
}

/// A region with its pin and drift against the baseline of the pinned line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStatus {
    #[serde(flatten)]
    pub region: Region,
    pub current_version: Option<RegionVersion>,
    pub plan: Option<PlanSummary>,
    /// Baseline of the pinned plan's version line, when configured
    pub baseline: Option<String>,
    pub drift: Option<Drift>,
}

impl RegionStatus {
    /// Assemble from a region, its pin (if any) and the pre-computed drift
    pub fn new(
        region: Region,
        pin: Option<RegionVersion>,
        plan: Option<&Plan>,
        drift: Option<&RegionDrift>,
    ) -> Self {
        Self {
            region,
            current_version: pin,
            plan: plan.map(PlanSummary::from),
            baseline: drift.and_then(|d| d.baseline.clone()),
            drift: drift.and_then(|d| d.drift),
        }
    }
}
