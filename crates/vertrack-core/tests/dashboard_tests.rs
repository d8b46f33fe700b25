#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{Duration, Utc};
use common::{line_config, pin, plan, plan_with_status, region};
use vertrack_core::dashboard::{aggregate, percent, region_drift};
use vertrack_core::model::{PlanStatus, VersionLineConfig};
use vertrack_core::version::Drift;

#[test]
fn test_two_of_three_at_baseline_is_67_percent() {
    let baseline = plan("25.8.2");
    let older = plan("25.8.1");
    let plans = vec![baseline.clone(), older.clone()];
    let regions = vec![region("a"), region("b"), region("c")];
    let pins = vec![
        pin(&regions[0], &baseline),
        pin(&regions[1], &baseline),
        pin(&regions[2], &older),
    ];
    let config = line_config(&["25.8"], &[("25.8", "25.8.2")]);

    let dashboard = aggregate(&plans, &regions, &pins, &config);

    assert_eq!(dashboard.version_lines.len(), 1);
    let line = &dashboard.version_lines[0];
    assert_eq!(line.version_line, "25.8");
    assert_eq!(line.baseline, "25.8.2");
    assert_eq!(line.total_regions, 3);
    assert_eq!(line.at_baseline, 2);
    assert_eq!(line.behind_baseline, 1);
    assert_eq!(line.alignment_rate, 67);
    assert_eq!(line.coverage, 100);
    assert_eq!(dashboard.stats.total_aligned_regions, 2);
    assert_eq!(dashboard.stats.overall_alignment_rate, 67);
}

#[test]
fn test_ahead_of_baseline_counts_as_behind() {
    let baseline = plan("25.8.1");
    let newer = plan("25.8.2");
    let regions = vec![region("a"), region("b")];
    let pins = vec![pin(&regions[0], &baseline), pin(&regions[1], &newer)];
    let config = line_config(&["25.8"], &[("25.8", "25.8.1")]);

    let dashboard = aggregate(&[baseline, newer], &regions, &pins, &config);
    assert_eq!(dashboard.version_lines[0].at_baseline, 1);
    assert_eq!(dashboard.version_lines[0].behind_baseline, 1);
    assert_eq!(dashboard.version_lines[0].alignment_rate, 50);
}

#[test]
fn test_lines_without_baseline_or_plan_are_skipped() {
    let plans = vec![plan("25.8.2"), plan("25.10.0")];
    let regions = vec![region("a")];
    let pins = vec![pin(&regions[0], &plans[1])];

    // 25.10 has no baseline; 25.6 baseline has no plan
    let config = line_config(&["25.10", "25.6", "25.8"], &[("25.6", "25.6.1"), ("25.8", "25.8.2")]);
    let dashboard = aggregate(&plans, &regions, &pins, &config);

    let lines: Vec<&str> = dashboard
        .version_lines
        .iter()
        .map(|l| l.version_line.as_str())
        .collect();
    assert_eq!(lines, vec!["25.8"]);
    assert_eq!(dashboard.version_lines[0].total_regions, 0);
    assert_eq!(dashboard.version_lines[0].alignment_rate, 0);
}

#[test]
fn test_coverage_splits_regions_across_lines() {
    let p8 = plan("25.8.2");
    let p10 = plan("25.10.0");
    let regions: Vec<_> = ["a", "b", "c", "d"].iter().map(|n| region(n)).collect();
    let pins = vec![
        pin(&regions[0], &p8),
        pin(&regions[1], &p10),
        pin(&regions[2], &p10),
        pin(&regions[3], &p10),
    ];
    let config = line_config(&["25.8", "25.10"], &[("25.8", "25.8.2"), ("25.10", "25.10.0")]);

    let dashboard = aggregate(&[p8, p10], &regions, &pins, &config);
    assert_eq!(dashboard.version_lines[0].coverage, 25);
    assert_eq!(dashboard.version_lines[1].coverage, 75);
    assert_eq!(dashboard.stats.overall_alignment_rate, 100);
}

#[test]
fn test_empty_inputs_produce_zero_rates() {
    let dashboard = aggregate(&[], &[], &[], &VersionLineConfig::default());
    assert_eq!(dashboard.stats.total_plans, 0);
    assert_eq!(dashboard.stats.overall_alignment_rate, 0);
    assert!(dashboard.version_lines.is_empty());
    assert_eq!(percent(3, 0), 0);
}

#[test]
fn test_plan_counts_and_recent_plans() {
    let mut plans = vec![
        plan_with_status("25.8.0", PlanStatus::Released),
        plan_with_status("25.8.1", PlanStatus::Released),
        plan_with_status("25.8.2", PlanStatus::Ready),
        plan_with_status("25.10.0", PlanStatus::Testing),
        plan_with_status("25.10.1", PlanStatus::Draft),
        plan_with_status("25.10.2", PlanStatus::Draft),
        plan_with_status("25.6.0", PlanStatus::Deprecated),
    ];
    let now = Utc::now();
    for (i, p) in plans.iter_mut().enumerate() {
        p.updated_at = now - Duration::minutes(i as i64);
    }

    let dashboard = aggregate(&plans, &[], &[], &VersionLineConfig::default());
    let stats = &dashboard.stats;
    assert_eq!(stats.total_plans, 7);
    assert_eq!(stats.released_plans, 2);
    assert_eq!(stats.draft_plans, 2);
    assert_eq!(stats.deprecated_plans, 1);

    let recent: Vec<&str> = dashboard
        .recent_plans
        .iter()
        .map(|p| p.version.as_str())
        .collect();
    assert_eq!(recent, vec!["25.8.0", "25.8.1", "25.8.2", "25.10.0", "25.10.1"]);
}

#[test]
fn test_region_drift_uses_pinned_line_baseline() {
    let plans = vec![plan("25.8.0"), plan("25.8.1.1"), plan("25.10.1"), plan("25.6.3")];
    let regions: Vec<_> = ["jnb", "sin", "gray", "old", "unpinned"]
        .iter()
        .map(|n| region(n))
        .collect();
    let pins = vec![
        pin(&regions[0], &plans[0]),
        pin(&regions[1], &plans[1]),
        pin(&regions[2], &plans[2]),
        pin(&regions[3], &plans[3]),
    ];
    let config = line_config(&["25.8", "25.10"], &[("25.8", "25.8.2"), ("25.10", "25.10.0")]);

    let drift = region_drift(&plans, &regions, &pins, &config);
    assert_eq!(drift.len(), 4);
    assert_eq!(drift[0].drift, Some(Drift::BehindMany));
    assert_eq!(drift[1].drift, Some(Drift::BehindOne));
    assert_eq!(drift[2].drift, Some(Drift::Ahead));
    assert_eq!(drift[3].baseline, None);
    assert_eq!(drift[3].drift, None);
}
