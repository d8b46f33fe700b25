//! Human-readable summary renderer for plan comparisons.

use crate::diff::model::{DiffChangeType, PlanComparison};

/// Render a Markdown summary of a [`PlanComparison`].
///
/// Informational only; the structured comparison is the source of truth.
pub fn render_human_summary(comparison: &PlanComparison) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## {} → {}\n\n",
        comparison.plan_a.version, comparison.plan_b.version
    ));

    if comparison.basic_info_changes.is_empty() && comparison.manifest_diff.is_empty() {
        out.push_str("_No differences._\n");
        return out;
    }

    if !comparison.basic_info_changes.is_empty() {
        out.push_str("### Basic Info\n\n");
        for change in &comparison.basic_info_changes {
            out.push_str(&format!(
                "- **{}**: `{}` → `{}`\n",
                change.field, change.old_value, change.new_value
            ));
        }
        out.push('\n');
    }

    if !comparison.manifest_diff.is_empty() {
        out.push_str(&format!(
            "### Manifest ({} changes)\n\n| Component | {} | {} | Change |\n|---|---|---|---|\n",
            comparison.manifest_diff.total_changes,
            comparison.plan_a.version,
            comparison.plan_b.version
        ));
        for entry in &comparison.manifest_diff.entries {
            let marker = match entry.change_type {
                DiffChangeType::Added => "+",
                DiffChangeType::Removed => "-",
                DiffChangeType::Changed => "~",
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} {} |\n",
                entry.component_name,
                entry.version_a,
                entry.version_b,
                marker,
                entry.change_type.as_str()
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{DiffEntry, FieldChange, ManifestDiff, PlanRef};

    fn plan_ref(version: &str) -> PlanRef {
        PlanRef {
            id: format!("id-{}", version),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_identical_renders_no_differences() {
        let comparison = PlanComparison {
            plan_a: plan_ref("25.8.0"),
            plan_b: plan_ref("25.8.0"),
            basic_info_changes: vec![],
            manifest_diff: ManifestDiff::default(),
        };
        assert!(render_human_summary(&comparison).contains("_No differences._"));
    }

    #[test]
    fn test_renders_rows() {
        let comparison = PlanComparison {
            plan_a: plan_ref("25.8.0"),
            plan_b: plan_ref("25.8.1"),
            basic_info_changes: vec![FieldChange {
                field: "summary".to_string(),
                old_value: "a".to_string(),
                new_value: "b".to_string(),
            }],
            manifest_diff: ManifestDiff {
                entries: vec![DiffEntry {
                    component_name: "ces-go-api".to_string(),
                    version_a: "25.8.0".to_string(),
                    version_b: "25.8.1".to_string(),
                    change_type: DiffChangeType::Changed,
                    reason_a: None,
                    reason_b: None,
                }],
                total_changes: 1,
            },
        };
        let out = render_human_summary(&comparison);
        assert!(out.contains("- **summary**: `a` → `b`"));
        assert!(out.contains("| ces-go-api | 25.8.0 | 25.8.1 | ~ changed |"));
    }
}
