use chrono::Utc;
use uuid::Uuid;

use crate::errors::Result;
use crate::model::{
    Catalog, ChangeType, CheckStatus, ComponentDraft, Manifest, ManifestComponent, ManifestDraft,
    ManifestPatch, Plan, PlanDraft, PlanType,
};
use crate::rules::{validate_manifest_draft, validate_manifest_patch};

/// Build a new manifest for `plan_id`
///
/// Missing change types default to `unchanged` and missing reasons to empty.
/// Both checks start as `ok`.
///
/// # Errors
/// * `MissingField` / `DuplicateComponent` / `UnknownComponent` - see
///   [`validate_manifest_draft`]
pub fn build_manifest(plan_id: &str, draft: ManifestDraft, catalog: &Catalog) -> Result<Manifest> {
    validate_manifest_draft(&draft, catalog)?;

    let now = Utc::now();
    Ok(Manifest {
        id: Uuid::now_v7().to_string(),
        plan_id: plan_id.to_string(),
        frontend_version: draft.frontend_version,
        frontend_change_type: draft.frontend_change_type.unwrap_or_default(),
        frontend_change_reason: draft.frontend_change_reason.unwrap_or_default(),
        fe_be_check_status: CheckStatus::Ok,
        fe_be_check_message: String::new(),
        dependency_check_status: CheckStatus::Ok,
        dependency_check_message: String::new(),
        components: draft
            .components
            .into_iter()
            .map(ComponentDraft::into_component)
            .collect(),
        created_at: now,
        updated_at: now,
    })
}

/// Apply an edit in place
///
/// Returns `true` when the component set was replaced. The replacement is
/// whole-set: components not listed in the patch are dropped.
pub fn apply_patch(manifest: &mut Manifest, patch: ManifestPatch, catalog: &Catalog) -> Result<bool> {
    validate_manifest_patch(&patch, catalog)?;

    if let Some(v) = patch.frontend_version {
        manifest.frontend_version = v;
    }
    if let Some(v) = patch.frontend_change_type {
        manifest.frontend_change_type = v;
    }
    if let Some(v) = patch.frontend_change_reason {
        manifest.frontend_change_reason = v;
    }
    if let Some(v) = patch.fe_be_check_status {
        manifest.fe_be_check_status = v;
    }
    if let Some(v) = patch.fe_be_check_message {
        manifest.fe_be_check_message = v;
    }
    if let Some(v) = patch.dependency_check_status {
        manifest.dependency_check_status = v;
    }
    if let Some(v) = patch.dependency_check_message {
        manifest.dependency_check_message = v;
    }

    let replaced = match patch.components {
        Some(components) => {
            manifest.components = components
                .into_iter()
                .map(ComponentDraft::into_component)
                .collect();
            true
        }
        None => false,
    };

    manifest.updated_at = Utc::now();
    Ok(replaced)
}

/// Draft for the plan created by a manifest copy
///
/// The summary defaults to `Copied from <source version>`.
pub fn copy_plan_draft(
    source: &Plan,
    new_version: &str,
    plan_type: Option<PlanType>,
    summary: Option<String>,
) -> PlanDraft {
    let summary = summary
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("Copied from {}", source.version));
    PlanDraft {
        version: new_version.to_string(),
        plan_type,
        summary,
        related_requirements: Vec::new(),
        related_bugs: Vec::new(),
    }
}

/// Copy `source` onto a new plan
///
/// Frontend and component versions carry over; change types reset to
/// `unchanged`, reasons and check messages are cleared, checks reset to `ok`.
pub fn copy_manifest(source: &Manifest, new_plan_id: &str) -> Manifest {
    let now = Utc::now();
    Manifest {
        id: Uuid::now_v7().to_string(),
        plan_id: new_plan_id.to_string(),
        frontend_version: source.frontend_version.clone(),
        frontend_change_type: ChangeType::Unchanged,
        frontend_change_reason: String::new(),
        fe_be_check_status: CheckStatus::Ok,
        fe_be_check_message: String::new(),
        dependency_check_status: CheckStatus::Ok,
        dependency_check_message: String::new(),
        components: source
            .components
            .iter()
            .map(|c| ManifestComponent {
                component_name: c.component_name.clone(),
                target_version: c.target_version.clone(),
                change_type: ChangeType::Unchanged,
                change_reason: String::new(),
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}
