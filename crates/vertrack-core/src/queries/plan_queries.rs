use std::cmp::Ordering;

use crate::model::{Plan, PlanFilter};
use crate::version::compare_versions;

/// Plans matching `filter`, newest first
pub fn filter_plans(plans: Vec<Plan>, filter: &PlanFilter) -> Vec<Plan> {
    let mut matched: Vec<Plan> = plans.into_iter().filter(|p| filter.matches(p)).collect();
    matched.sort_by(newest_first);
    matched
}

/// Order by `created_at` descending, ties broken by version descending
///
/// Versions compare numerically (`25.8.10` sorts above `25.8.9`).
pub fn newest_first(a: &Plan, b: &Plan) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| {
        compare_versions(&b.version, &a.version).unwrap_or_else(|_| b.version.cmp(&a.version))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlanStatus, PlanType};
    use chrono::{Duration, Utc};

    fn plan(version: &str, age_days: i64, status: PlanStatus) -> Plan {
        let mut p = Plan::new(version, version, "25.8", PlanType::Release, "s");
        p.created_at = Utc::now() - Duration::days(age_days);
        p.status = status;
        p
    }

    #[test]
    fn test_newest_first_and_deprecated_hidden() {
        let plans = vec![
            plan("25.8.0", 3, PlanStatus::Released),
            plan("25.8.2", 1, PlanStatus::Ready),
            plan("25.8.1", 2, PlanStatus::Deprecated),
        ];
        let listed = filter_plans(plans.clone(), &PlanFilter::default());
        let versions: Vec<&str> = listed.iter().map(|p| p.version.as_str()).collect();
        assert_eq!(versions, vec!["25.8.2", "25.8.0"]);

        let all = filter_plans(
            plans,
            &PlanFilter {
                include_deprecated: true,
                ..Default::default()
            },
        );
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_same_instant_ties_sort_numerically() {
        let created_at = Utc::now();
        let plans: Vec<Plan> = ["25.8.9", "25.8.10", "25.8.9.1"]
            .into_iter()
            .map(|v| {
                let mut p = plan(v, 0, PlanStatus::Draft);
                p.created_at = created_at;
                p
            })
            .collect();

        let listed = filter_plans(plans, &PlanFilter::default());
        let versions: Vec<&str> = listed.iter().map(|p| p.version.as_str()).collect();

        assert_eq!(versions, vec!["25.8.10", "25.8.9.1", "25.8.9"]);
    }
}
