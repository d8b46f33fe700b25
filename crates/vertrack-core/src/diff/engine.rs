//! Diff computation.

use std::collections::{BTreeMap, BTreeSet};

use crate::diff::model::{
    DiffChangeType, DiffEntry, FieldChange, ManifestDiff, ABSENT_VERSION, FRONTEND_ENTRY,
};
use crate::model::{Manifest, ManifestComponent, Plan};

/// Compare two manifests
///
/// Emits a frontend entry when the frontend versions differ, then one entry
/// per component whose presence or target version differs, sorted by name.
/// Components with equal target versions produce no entry, even when their
/// change type or reason differs.
pub fn diff_manifests(a: &Manifest, b: &Manifest) -> ManifestDiff {
    let mut entries = Vec::new();

    if a.frontend_version != b.frontend_version {
        entries.push(DiffEntry {
            component_name: FRONTEND_ENTRY.to_string(),
            version_a: a.frontend_version.clone(),
            version_b: b.frontend_version.clone(),
            change_type: DiffChangeType::Changed,
            reason_a: None,
            reason_b: None,
        });
    }

    let by_name_a = index_components(&a.components);
    let by_name_b = index_components(&b.components);
    let names: BTreeSet<&str> = by_name_a.keys().chain(by_name_b.keys()).copied().collect();

    for name in names {
        let entry = match (by_name_a.get(name), by_name_b.get(name)) {
            (None, Some(cb)) => DiffEntry {
                component_name: name.to_string(),
                version_a: ABSENT_VERSION.to_string(),
                version_b: cb.target_version.clone(),
                change_type: DiffChangeType::Added,
                reason_a: None,
                reason_b: Some(cb.change_reason.clone()),
            },
            (Some(ca), None) => DiffEntry {
                component_name: name.to_string(),
                version_a: ca.target_version.clone(),
                version_b: ABSENT_VERSION.to_string(),
                change_type: DiffChangeType::Removed,
                reason_a: Some(ca.change_reason.clone()),
                reason_b: None,
            },
            (Some(ca), Some(cb)) if ca.target_version != cb.target_version => DiffEntry {
                component_name: name.to_string(),
                version_a: ca.target_version.clone(),
                version_b: cb.target_version.clone(),
                change_type: DiffChangeType::Changed,
                reason_a: Some(ca.change_reason.clone()),
                reason_b: Some(cb.change_reason.clone()),
            },
            _ => continue,
        };
        entries.push(entry);
    }

    let total_changes = entries.len();
    tracing::debug!(total_changes, "manifest diff computed");
    ManifestDiff {
        entries,
        total_changes,
    }
}

fn index_components(components: &[ManifestComponent]) -> BTreeMap<&str, &ManifestComponent> {
    components
        .iter()
        .map(|c| (c.component_name.as_str(), c))
        .collect()
}

/// Compare the basic info of two plans
///
/// Fields compared, in order: `type`, `status`, `summary`,
/// `related_requirements`, `related_bugs`.
pub fn diff_plan_info(a: &Plan, b: &Plan) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    push_if_changed(&mut changes, "type", a.plan_type.as_str(), b.plan_type.as_str());
    push_if_changed(&mut changes, "status", a.status.as_str(), b.status.as_str());
    push_if_changed(&mut changes, "summary", &a.summary, &b.summary);
    push_set_if_changed(
        &mut changes,
        "related_requirements",
        &a.related_requirements,
        &b.related_requirements,
    );
    push_set_if_changed(&mut changes, "related_bugs", &a.related_bugs, &b.related_bugs);

    changes
}

fn push_if_changed(changes: &mut Vec<FieldChange>, field: &str, old: &str, new: &str) {
    if old != new {
        changes.push(FieldChange {
            field: field.to_string(),
            old_value: old.to_string(),
            new_value: new.to_string(),
        });
    }
}

fn push_set_if_changed(changes: &mut Vec<FieldChange>, field: &str, old: &[String], new: &[String]) {
    let old_set: BTreeSet<&String> = old.iter().collect();
    let new_set: BTreeSet<&String> = new.iter().collect();
    if old_set != new_set {
        changes.push(FieldChange {
            field: field.to_string(),
            old_value: render_set(&old_set),
            new_value: render_set(&new_set),
        });
    }
}

fn render_set(set: &BTreeSet<&String>) -> String {
    // Serializing a set of strings cannot fail
    serde_json::to_string(set).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeType, PlanType};
    use chrono::Utc;

    fn manifest(frontend: &str, components: &[(&str, &str)]) -> Manifest {
        Manifest {
            id: "m".to_string(),
            plan_id: "p".to_string(),
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
                    change_reason: format!("{} reason", name),
                })
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_frontend_entry_comes_first() {
        let a = manifest("25.8.0", &[("alarm-engine", "25.8.0")]);
        let b = manifest("25.8.2", &[("alarm-engine", "25.8.2")]);
        let diff = diff_manifests(&a, &b);

        assert_eq!(diff.total_changes, 2);
        assert_eq!(diff.entries[0].component_name, FRONTEND_ENTRY);
        assert_eq!(diff.entries[0].reason_a, None);
        assert_eq!(diff.entries[1].component_name, "alarm-engine");
    }

    #[test]
    fn test_added_and_removed_use_placeholder() {
        let a = manifest("1.0.0", &[("guard", "1.0.0")]);
        let b = manifest("1.0.0", &[("hermes", "1.0.1")]);
        let diff = diff_manifests(&a, &b);

        let guard = diff.entry("guard").unwrap();
        assert_eq!(guard.change_type, DiffChangeType::Removed);
        assert_eq!(guard.version_b, ABSENT_VERSION);
        assert_eq!(guard.reason_a.as_deref(), Some("guard reason"));

        let hermes = diff.entry("hermes").unwrap();
        assert_eq!(hermes.change_type, DiffChangeType::Added);
        assert_eq!(hermes.version_a, ABSENT_VERSION);
        assert_eq!(hermes.reason_b.as_deref(), Some("hermes reason"));
    }

    #[test]
    fn test_plan_info_lists_compared_as_sets() {
        let mut a = Plan::new("a", "25.8.1", "25.8", PlanType::Release, "same");
        let mut b = Plan::new("b", "25.8.2", "25.8", PlanType::Release, "same");
        a.related_requirements = vec!["R-2".into(), "R-1".into()];
        b.related_requirements = vec!["R-1".into(), "R-2".into(), "R-1".into()];

        assert!(diff_plan_info(&a, &b).is_empty());

        b.related_bugs = vec!["BUG-9".into()];
        let changes = diff_plan_info(&a, &b);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "related_bugs");
        assert_eq!(changes[0].old_value, "[]");
        assert_eq!(changes[0].new_value, r#"["BUG-9"]"#);
    }
}
