//! Diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use serde::{Deserialize, Serialize};

use crate::model::Plan;

/// Component name used for the frontend row of a manifest diff
pub const FRONTEND_ENTRY: &str = "frontend";

/// Placeholder for the side of a diff where a component is absent
pub const ABSENT_VERSION: &str = "-";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffChangeType {
    /// Present only in B
    Added,
    /// Present only in A
    Removed,
    /// Present in both with different versions
    Changed,
}

impl DiffChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffChangeType::Added => "added",
            DiffChangeType::Removed => "removed",
            DiffChangeType::Changed => "changed",
        }
    }

    /// The change type seen from the other side
    pub fn inverse(&self) -> Self {
        match self {
            DiffChangeType::Added => DiffChangeType::Removed,
            DiffChangeType::Removed => DiffChangeType::Added,
            DiffChangeType::Changed => DiffChangeType::Changed,
        }
    }
}

/// One differing row of a manifest diff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffEntry {
    pub component_name: String,
    /// Version in A, or `"-"` when absent
    pub version_a: String,
    /// Version in B, or `"-"` when absent
    pub version_b: String,
    pub change_type: DiffChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_b: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestDiff {
    pub entries: Vec<DiffEntry>,
    pub total_changes: usize,
}

impl ManifestDiff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, component_name: &str) -> Option<&DiffEntry> {
        self.entries
            .iter()
            .find(|e| e.component_name == component_name)
    }
}

/// A basic-info field that differs between two plans
///
/// List fields are rendered as JSON arrays of their sorted, de-duplicated values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// Identity of one side of a comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanRef {
    pub id: String,
    pub version: String,
}

impl From<&Plan> for PlanRef {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            version: plan.version.clone(),
        }
    }
}

/// Full comparison of two plans
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanComparison {
    pub plan_a: PlanRef,
    pub plan_b: PlanRef,
    pub basic_info_changes: Vec<FieldChange>,
    pub manifest_diff: ManifestDiff,
}
