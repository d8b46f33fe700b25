//! Dashboard aggregation.
//!
//! Pure functions over plain data: the caller loads plans, regions, pins and
//! the [`VersionLineConfig`] and passes them in. Nothing here touches storage.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AuditEntry, Plan, PlanStatus, PlanType, Region, RegionVersion, VersionLineConfig};
use crate::version::{classify, Drift, Version};

/// Number of plans listed under `recent_plans`
pub const RECENT_PLANS_LIMIT: usize = 5;
/// Number of audit entries listed under `recent_logs`
pub const RECENT_LOGS_LIMIT: usize = 10;

/// Plan and region counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub total_plans: usize,
    pub draft_plans: usize,
    pub testing_plans: usize,
    pub ready_plans: usize,
    pub released_plans: usize,
    pub deprecated_plans: usize,
    pub total_regions: usize,
    pub total_aligned_regions: usize,
    pub overall_alignment_rate: u32,
}

/// Alignment of one active version line against its baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLineStats {
    pub version_line: String,
    pub baseline: String,
    /// Regions pinned to any plan on this line
    pub total_regions: usize,
    pub at_baseline: usize,
    pub behind_baseline: usize,
    pub alignment_rate: u32,
    pub coverage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: String,
    pub version: String,
    pub version_line: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub status: PlanStatus,
    pub summary: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            version: plan.version.clone(),
            version_line: plan.version_line.clone(),
            plan_type: plan.plan_type,
            status: plan.status,
            summary: plan.summary.clone(),
            updated_at: plan.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: PlanStats,
    pub version_lines: Vec<VersionLineStats>,
    pub recent_plans: Vec<PlanSummary>,
    /// Filled by the caller that owns the audit log
    #[serde(default)]
    pub recent_logs: Vec<AuditEntry>,
}

/// Drift of one pinned region against the baseline of its plan's line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDrift {
    pub region_id: String,
    pub region_name: String,
    pub plan_id: String,
    pub current_version: String,
    pub version_line: String,
    /// `None` when the line has no configured baseline
    pub baseline: Option<String>,
    pub drift: Option<Drift>,
}

/// `round(part / whole * 100)` with half-up rounding; 0 when `whole` is 0
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u64;
    let whole = whole as u64;
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Aggregate dashboard statistics
///
/// Lines without a configured baseline, or whose baseline version has no
/// plan, are skipped. A pin counts as at-baseline only when it points at
/// exactly the baseline plan; every other pin on the line counts as behind.
pub fn aggregate(
    plans: &[Plan],
    regions: &[Region],
    pins: &[RegionVersion],
    config: &VersionLineConfig,
) -> Dashboard {
    let plans_by_id: HashMap<&str, &Plan> = plans.iter().map(|p| (p.id.as_str(), p)).collect();
    let total_regions = regions.len();

    let mut version_lines = Vec::new();
    let mut total_aligned_regions = 0;

    for line in &config.active_lines {
        let Some(baseline) = config.baseline(line) else {
            tracing::debug!(version_line = %line, "no baseline configured, line skipped");
            continue;
        };
        let Some(baseline_plan) = plans.iter().find(|p| p.version == baseline) else {
            tracing::debug!(version_line = %line, baseline, "baseline plan missing, line skipped");
            continue;
        };

        let on_line: Vec<&RegionVersion> = pins
            .iter()
            .filter(|pin| {
                plans_by_id
                    .get(pin.plan_id.as_str())
                    .is_some_and(|plan| plan.version_line == *line)
            })
            .collect();
        let line_total = on_line.len();
        let at_baseline = on_line
            .iter()
            .filter(|pin| pin.plan_id == baseline_plan.id)
            .count();
        total_aligned_regions += at_baseline;

        version_lines.push(VersionLineStats {
            version_line: line.clone(),
            baseline: baseline.to_string(),
            total_regions: line_total,
            at_baseline,
            behind_baseline: line_total - at_baseline,
            alignment_rate: percent(at_baseline, line_total),
            coverage: percent(line_total, total_regions),
        });
    }

    let count = |status: PlanStatus| plans.iter().filter(|p| p.status == status).count();
    let stats = PlanStats {
        total_plans: plans.len(),
        draft_plans: count(PlanStatus::Draft),
        testing_plans: count(PlanStatus::Testing),
        ready_plans: count(PlanStatus::Ready),
        released_plans: count(PlanStatus::Released),
        deprecated_plans: count(PlanStatus::Deprecated),
        total_regions,
        total_aligned_regions,
        overall_alignment_rate: percent(total_aligned_regions, total_regions),
    };

    Dashboard {
        stats,
        version_lines,
        recent_plans: recent_plans(plans, RECENT_PLANS_LIMIT),
        recent_logs: Vec::new(),
    }
}

/// Most recently updated plans, newest first
pub fn recent_plans(plans: &[Plan], limit: usize) -> Vec<PlanSummary> {
    let mut sorted: Vec<&Plan> = plans.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.into_iter().take(limit).map(PlanSummary::from).collect()
}

/// Four-way drift of every pinned region
///
/// Regions without a pin, or pinned to an unknown plan, are omitted. A plan
/// or baseline whose version does not parse yields `drift: None`.
pub fn region_drift(
    plans: &[Plan],
    regions: &[Region],
    pins: &[RegionVersion],
    config: &VersionLineConfig,
) -> Vec<RegionDrift> {
    let plans_by_id: HashMap<&str, &Plan> = plans.iter().map(|p| (p.id.as_str(), p)).collect();
    let pins_by_region: HashMap<&str, &RegionVersion> =
        pins.iter().map(|pin| (pin.region_id.as_str(), pin)).collect();

    regions
        .iter()
        .filter_map(|region| {
            let pin = pins_by_region.get(region.id.as_str())?;
            let plan = plans_by_id.get(pin.plan_id.as_str())?;
            let baseline = config.baseline(&plan.version_line).map(str::to_string);
            let drift = baseline
                .as_deref()
                .and_then(|b| drift_of(&plan.version, b));
            Some(RegionDrift {
                region_id: region.id.clone(),
                region_name: region.name.clone(),
                plan_id: plan.id.clone(),
                current_version: plan.version.clone(),
                version_line: plan.version_line.clone(),
                baseline,
                drift,
            })
        })
        .collect()
}

fn drift_of(current: &str, baseline: &str) -> Option<Drift> {
    let current = Version::parse(current).ok()?;
    let baseline = Version::parse(baseline).ok()?;
    Some(classify(&current, &baseline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 5), 100);
    }
}
