use std::collections::HashSet;

use crate::errors::{Result, TrackerError};
use crate::model::config::{parse_active_lines, ACTIVE_VERSION_LINES_KEY, BASELINE_KEY_PREFIX};
use crate::model::{
    Catalog, ComponentDraft, ManifestDraft, ManifestPatch, Plan, PlanDraft, PlanStatus, PlanType,
    PlanUpdate,
};
use crate::version::{validate_version_line, Version};

/// Validate a plan draft and resolve its type
///
/// The type is inferred from the segment count when the draft leaves it
/// empty (3 → Release, 4 → Patch).
///
/// # Errors
/// * `InvalidVersion` - version does not parse
/// * `VersionTypeMismatch` - explicit type disagrees with the segment count
/// * `MissingField` - summary is blank
pub fn validate_plan_draft(draft: &PlanDraft) -> Result<(Version, PlanType)> {
    let version = Version::parse(&draft.version)?;

    let plan_type = match draft.plan_type {
        Some(plan_type) => {
            if plan_type.expected_segments() != version.segment_count() {
                return Err(TrackerError::VersionTypeMismatch {
                    version: draft.version.clone(),
                    plan_type: plan_type.to_string(),
                    segments: version.segment_count(),
                });
            }
            plan_type
        }
        None if version.is_patch() => PlanType::Patch,
        None => PlanType::Release,
    };

    require_non_blank("summary", &draft.summary)?;
    Ok((version, plan_type))
}

/// Validate a plan edit; a supplied summary must not be blank
///
/// # Errors
/// * `MissingField` - summary is supplied but blank
pub fn validate_plan_update(update: &PlanUpdate) -> Result<()> {
    if let Some(summary) = &update.summary {
        require_non_blank("summary", summary)?;
    }
    Ok(())
}

/// Validate a manifest draft against the component catalog
///
/// # Errors
/// * `MissingField` - blank frontend version, component name or target version
/// * `DuplicateComponent` - a component name appears twice
/// * `UnknownComponent` - a component is not in the catalog
pub fn validate_manifest_draft(draft: &ManifestDraft, catalog: &Catalog) -> Result<()> {
    require_non_blank("frontend_version", &draft.frontend_version)?;
    validate_components(&draft.components, catalog)
}

/// Validate a manifest edit; only supplied fields are checked
pub fn validate_manifest_patch(patch: &ManifestPatch, catalog: &Catalog) -> Result<()> {
    if let Some(frontend_version) = &patch.frontend_version {
        require_non_blank("frontend_version", frontend_version)?;
    }
    if let Some(components) = &patch.components {
        validate_components(components, catalog)?;
    }
    Ok(())
}

pub fn validate_components(components: &[ComponentDraft], catalog: &Catalog) -> Result<()> {
    let mut seen = HashSet::new();
    for component in components {
        require_non_blank("component_name", &component.component_name)?;
        require_non_blank("target_version", &component.target_version)?;
        if !seen.insert(component.component_name.as_str()) {
            return Err(TrackerError::DuplicateComponent {
                component: component.component_name.clone(),
            });
        }
        if !catalog.contains_component(&component.component_name) {
            return Err(TrackerError::UnknownComponent {
                component: component.component_name.clone(),
            });
        }
    }
    Ok(())
}

/// Validate a config key/value before upsert
///
/// `active_version_lines` must be a JSON array of `major.minor` lines and a
/// `baseline_<line>` value must be a version on that line. Lines and
/// baselines must be written the way plan versions are stored (`25.8.1`, not
/// `25.08.01`) or the dashboard could never match them. Other keys only need
/// a non-blank key and value.
///
/// # Errors
/// * `MissingField` - blank key or value
/// * `InvalidConfig` - malformed lines array, a non-canonical baseline or a
///   baseline off its line
/// * `InvalidVersionLine` / `InvalidVersion` - malformed line or version
pub fn validate_config_entry(key: &str, value: &str) -> Result<()> {
    require_non_blank("key", key)?;
    require_non_blank("value", value)?;

    if key == ACTIVE_VERSION_LINES_KEY {
        for line in parse_active_lines(value)? {
            validate_version_line(&line)?;
        }
    } else if let Some(line) = key.strip_prefix(BASELINE_KEY_PREFIX) {
        validate_version_line(line)?;
        let baseline = Version::parse(value)?;
        if baseline.to_string() != value {
            return Err(TrackerError::InvalidConfig {
                key: key.to_string(),
                reason: format!("baseline {} is not written as {}", value, baseline),
            });
        }
        if baseline.line() != line {
            return Err(TrackerError::InvalidConfig {
                key: key.to_string(),
                reason: format!("baseline {} is not on version line {}", value, line),
            });
        }
    }
    Ok(())
}

/// Check that `plan` may move to `target`
///
/// Any status may be set directly, except that a deprecated plan is terminal.
/// Setting the current status again is a no-op and always allowed.
///
/// # Errors
/// * `DeprecatedPlan` - plan is deprecated and `target` differs
pub fn validate_status_transition(plan: &Plan, target: PlanStatus) -> Result<()> {
    if plan.status == target {
        return Ok(());
    }
    if plan.status.is_terminal() {
        return Err(TrackerError::DeprecatedPlan {
            plan_id: plan.id.clone(),
        });
    }
    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackerError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}
