use chrono::Utc;
use vertrack_core::model::{
    ChangeType, ConfigEntry, Manifest, ManifestComponent, Plan, PlanStatus, PlanType, Region,
    RegionArea, RegionVersion, VersionLineConfig,
};

/// Plan with id `plan-<version>` on the version's line
#[allow(dead_code)]
pub fn plan(version: &str) -> Plan {
    let segments: Vec<&str> = version.split('.').collect();
    let plan_type = if segments.len() == 4 {
        PlanType::Patch
    } else {
        PlanType::Release
    };
    Plan::new(
        plan_id(version),
        version,
        format!("{}.{}", segments[0], segments[1]),
        plan_type,
        format!("release {}", version),
    )
}

#[allow(dead_code)]
pub fn plan_with_status(version: &str, status: PlanStatus) -> Plan {
    let mut p = plan(version);
    p.status = status;
    p
}

#[allow(dead_code)]
pub fn plan_id(version: &str) -> String {
    format!("plan-{}", version)
}

/// Manifest whose components all use change type `unchanged`
#[allow(dead_code)]
pub fn manifest(plan_version: &str, frontend: &str, components: &[(&str, &str)]) -> Manifest {
    let now = Utc::now();
    Manifest {
        id: format!("manifest-{}", plan_version),
        plan_id: plan_id(plan_version),
        frontend_version: frontend.to_string(),
        frontend_change_type: ChangeType::Unchanged,
        frontend_change_reason: String::new(),
        fe_be_check_status: Default::default(),
        fe_be_check_message: String::new(),
        dependency_check_status: Default::default(),
        dependency_check_message: String::new(),
        components: components
            .iter()
            .map(|(name, version)| ManifestComponent {
                component_name: name.to_string(),
                target_version: version.to_string(),
                change_type: ChangeType::Unchanged,
                change_reason: String::new(),
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

#[allow(dead_code)]
pub fn region(name: &str) -> Region {
    Region {
        id: format!("region-{}", name),
        name: name.to_string(),
        area: RegionArea::Domestic,
        is_gray: false,
    }
}

#[allow(dead_code)]
pub fn pin(region: &Region, plan: &Plan) -> RegionVersion {
    RegionVersion {
        region_id: region.id.clone(),
        plan_id: plan.id.clone(),
        backend_ready: true,
        frontend_ready: true,
        last_updated_at: Utc::now(),
    }
}

/// Config with the given active lines and `(line, baseline)` pairs
#[allow(dead_code)]
pub fn line_config(lines: &[&str], baselines: &[(&str, &str)]) -> VersionLineConfig {
    let mut entries = vec![ConfigEntry::new(
        "active_version_lines",
        serde_json::to_string(lines).unwrap(),
    )];
    for (line, baseline) in baselines {
        entries.push(ConfigEntry::new(format!("baseline_{}", line), *baseline));
    }
    VersionLineConfig::from_entries(&entries).unwrap()
}
