use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// How a component (or the frontend) changed in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    New,
    Upgrade,
    #[default]
    Unchanged,
    Removed,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::New => "new",
            ChangeType::Upgrade => "upgrade",
            ChangeType::Unchanged => "unchanged",
            ChangeType::Removed => "removed",
        }
    }
}

impl FromStr for ChangeType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ChangeType::New),
            "upgrade" => Ok(ChangeType::Upgrade),
            "unchanged" => Ok(ChangeType::Unchanged),
            "removed" => Ok(ChangeType::Removed),
            other => Err(TrackerError::InvalidValue {
                field: "change_type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a compatibility check recorded on a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    #[default]
    Ok,
    Warn,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Error => "error",
        }
    }
}

impl FromStr for CheckStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(CheckStatus::Ok),
            "warn" => Ok(CheckStatus::Warn),
            "error" => Ok(CheckStatus::Error),
            other => Err(TrackerError::InvalidValue {
                field: "check_status".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend component pinned by a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestComponent {
    pub component_name: String,
    pub target_version: String,
    pub change_type: ChangeType,
    pub change_reason: String,
}

/// Frontend + backend component target versions bundled into a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,
    pub plan_id: String,
    pub frontend_version: String,
    pub frontend_change_type: ChangeType,
    pub frontend_change_reason: String,
    pub fe_be_check_status: CheckStatus,
    pub fe_be_check_message: String,
    pub dependency_check_status: CheckStatus,
    pub dependency_check_message: String,
    /// Sorted by component name
    pub components: Vec<ManifestComponent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Manifest {
    /// Look up a component by name
    pub fn component(&self, name: &str) -> Option<&ManifestComponent> {
        self.components.iter().find(|c| c.component_name == name)
    }
}

/// Component entry as supplied by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentDraft {
    pub component_name: String,
    pub target_version: String,
    #[serde(default)]
    pub change_type: Option<ChangeType>,
    #[serde(default)]
    pub change_reason: Option<String>,
}

impl ComponentDraft {
    pub fn new(component_name: impl Into<String>, target_version: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            target_version: target_version.into(),
            change_type: None,
            change_reason: None,
        }
    }

    pub fn into_component(self) -> ManifestComponent {
        ManifestComponent {
            component_name: self.component_name,
            target_version: self.target_version,
            change_type: self.change_type.unwrap_or_default(),
            change_reason: self.change_reason.unwrap_or_default(),
        }
    }
}

/// Input for creating a manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestDraft {
    pub frontend_version: String,
    #[serde(default)]
    pub frontend_change_type: Option<ChangeType>,
    #[serde(default)]
    pub frontend_change_reason: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentDraft>,
}

/// Manifest edit; `None` leaves the field unchanged and `components: Some`
/// replaces the whole component set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestPatch {
    pub frontend_version: Option<String>,
    pub frontend_change_type: Option<ChangeType>,
    pub frontend_change_reason: Option<String>,
    pub fe_be_check_status: Option<CheckStatus>,
    pub fe_be_check_message: Option<String>,
    pub dependency_check_status: Option<CheckStatus>,
    pub dependency_check_message: Option<String>,
    pub components: Option<Vec<ComponentDraft>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_draft_defaults() {
        let component = ComponentDraft::new("guard", "25.8.0").into_component();
        assert_eq!(component.change_type, ChangeType::Unchanged);
        assert_eq!(component.change_reason, "");
    }

    #[test]
    fn test_draft_deserializes_with_missing_optionals() {
        let draft: ManifestDraft = serde_json::from_str(
            r#"{"frontend_version":"25.8.0","components":[{"component_name":"guard","target_version":"25.8.0"}]}"#,
        )
        .unwrap();
        assert!(draft.frontend_change_type.is_none());
        assert_eq!(draft.components.len(), 1);
    }

    #[test]
    fn test_enum_parsing_rejects_unknown() {
        assert_eq!("upgrade".parse::<ChangeType>().unwrap(), ChangeType::Upgrade);
        assert!("downgrade".parse::<ChangeType>().is_err());
        assert_eq!("warn".parse::<CheckStatus>().unwrap(), CheckStatus::Warn);
        assert!("fatal".parse::<CheckStatus>().is_err());
    }
}
