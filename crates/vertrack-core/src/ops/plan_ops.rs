use chrono::Utc;
use uuid::Uuid;

use crate::diff::{diff_plan_info, FieldChange};
use crate::errors::Result;
use crate::model::{Plan, PlanDraft, PlanStatus, PlanUpdate};
use crate::rules::{validate_plan_draft, validate_plan_update, validate_status_transition};

/// Create a new draft plan from a validated draft
///
/// Generates a UUID v7 id and derives the version line from the version.
/// Version uniqueness is enforced by the store.
///
/// # Errors
/// * `InvalidVersion` - version does not parse
/// * `VersionTypeMismatch` - type disagrees with the segment count
/// * `MissingField` - summary is blank
pub fn new_plan(draft: PlanDraft) -> Result<Plan> {
    let (version, plan_type) = validate_plan_draft(&draft)?;

    let mut plan = Plan::new(
        Uuid::now_v7().to_string(),
        version.to_string(),
        version.line(),
        plan_type,
        draft.summary.trim(),
    );
    plan.related_requirements = draft.related_requirements;
    plan.related_bugs = draft.related_bugs;
    Ok(plan)
}

/// Apply an edit and return the basic-info fields that changed
///
/// The summary is trimmed like on create. `updated_at` is bumped only when
/// something changed.
///
/// # Errors
/// * `MissingField` - summary is supplied but blank
pub fn apply_update(plan: &mut Plan, update: PlanUpdate) -> Result<Vec<FieldChange>> {
    validate_plan_update(&update)?;
    let before = plan.clone();

    if let Some(summary) = update.summary {
        plan.summary = summary.trim().to_string();
    }
    if let Some(requirements) = update.related_requirements {
        plan.related_requirements = requirements;
    }
    if let Some(bugs) = update.related_bugs {
        plan.related_bugs = bugs;
    }

    let changes = diff_plan_info(&before, plan);
    if !changes.is_empty() {
        plan.updated_at = Utc::now();
    }
    Ok(changes)
}

/// Move `plan` to `target` and return the previous status
///
/// # Errors
/// * `DeprecatedPlan` - plan is deprecated and `target` differs
pub fn transition_status(plan: &mut Plan, target: PlanStatus) -> Result<PlanStatus> {
    validate_status_transition(plan, target)?;
    let previous = plan.status;
    if previous != target {
        plan.status = target;
        plan.updated_at = Utc::now();
    }
    Ok(previous)
}

/// Soft-delete: flip the status to `deprecated`
///
/// Version and manifest are left untouched. Deprecating twice is a no-op.
pub fn deprecate(plan: &mut Plan) -> Result<PlanStatus> {
    transition_status(plan, PlanStatus::Deprecated)
}
