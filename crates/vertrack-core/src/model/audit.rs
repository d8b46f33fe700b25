use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Kind of entity an audit entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Plan,
    Manifest,
    Region,
    Config,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Plan => "plan",
            EntityType::Manifest => "manifest",
            EntityType::Region => "region",
            EntityType::Config => "config",
        }
    }
}

impl FromStr for EntityType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plan" => Ok(EntityType::Plan),
            "manifest" => Ok(EntityType::Manifest),
            "region" => Ok(EntityType::Region),
            "config" => Ok(EntityType::Config),
            other => Err(TrackerError::InvalidValue {
                field: "entity_type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    StatusChange,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::StatusChange => "status_change",
        }
    }
}

impl FromStr for AuditAction {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(AuditAction::Create),
            "update" => Ok(AuditAction::Update),
            "delete" => Ok(AuditAction::Delete),
            "status_change" => Ok(AuditAction::StatusChange),
            other => Err(TrackerError::InvalidValue {
                field: "action".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Assigned by the store on append
    pub id: Option<i64>,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub operator: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        action: AuditAction,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            entity_type,
            entity_id: entity_id.into(),
            action,
            field: None,
            old_value: None,
            new_value: None,
            operator: operator.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_old_value(mut self, value: impl Into<String>) -> Self {
        self.old_value = Some(value.into());
        self
    }

    pub fn with_new_value(mut self, value: impl Into<String>) -> Self {
        self.new_value = Some(value.into());
        self
    }
}
