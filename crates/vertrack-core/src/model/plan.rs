use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Release kind, tied to the number of version segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    /// `major.minor.patch`
    Release,
    /// `major.minor.patch.sub`
    Patch,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Release => "Release",
            PlanType::Patch => "Patch",
        }
    }

    /// Number of version segments a plan of this type carries
    pub fn expected_segments(&self) -> usize {
        match self {
            PlanType::Release => crate::version::RELEASE_SEGMENTS,
            PlanType::Patch => crate::version::PATCH_SEGMENTS,
        }
    }
}

impl FromStr for PlanType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Release" => Ok(PlanType::Release),
            "Patch" => Ok(PlanType::Patch),
            other => Err(TrackerError::InvalidValue {
                field: "type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan lifecycle: draft → testing → ready → released; deprecated is the
/// terminal soft-delete state reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Draft,
    Testing,
    Ready,
    Released,
    Deprecated,
}

impl PlanStatus {
    pub const ALL: [PlanStatus; 5] = [
        PlanStatus::Draft,
        PlanStatus::Testing,
        PlanStatus::Ready,
        PlanStatus::Released,
        PlanStatus::Deprecated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Testing => "testing",
            PlanStatus::Ready => "ready",
            PlanStatus::Released => "released",
            PlanStatus::Deprecated => "deprecated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Deprecated)
    }
}

impl FromStr for PlanStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TrackerError::InvalidValue {
                field: "status".to_string(),
                value: s.to_string(),
            })
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, versioned release record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Surrogate identifier (UUID v7)
    pub id: String,

    /// Globally unique version string
    pub version: String,

    /// `major.minor` prefix of `version`
    pub version_line: String,

    #[serde(rename = "type")]
    pub plan_type: PlanType,

    pub status: PlanStatus,

    pub summary: String,

    /// Ticket IDs; compared as a set
    pub related_requirements: Vec<String>,

    /// Ticket IDs; compared as a set
    pub related_bugs: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Plan {
    /// Create a draft plan with current timestamps
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        version_line: impl Into<String>,
        plan_type: PlanType,
        summary: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            version: version.into(),
            version_line: version_line.into(),
            plan_type,
            status: PlanStatus::Draft,
            summary: summary.into(),
            related_requirements: Vec::new(),
            related_bugs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.status == PlanStatus::Deprecated
    }
}

/// Input for creating a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDraft {
    pub version: String,
    #[serde(rename = "type")]
    pub plan_type: Option<PlanType>,
    pub summary: String,
    #[serde(default)]
    pub related_requirements: Vec<String>,
    #[serde(default)]
    pub related_bugs: Vec<String>,
}

/// Editable plan fields; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanUpdate {
    pub summary: Option<String>,
    pub related_requirements: Option<Vec<String>>,
    pub related_bugs: Option<Vec<String>>,
}

/// Listing filter for plans
///
/// Deprecated plans are hidden unless `include_deprecated` is set or the
/// status filter asks for them explicitly.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    pub status: Option<PlanStatus>,
    pub plan_type: Option<PlanType>,
    /// Substring matched against version and summary
    pub search: Option<String>,
    pub include_deprecated: bool,
}

impl PlanFilter {
    pub fn matches(&self, plan: &Plan) -> bool {
        if let Some(status) = self.status {
            if plan.status != status {
                return false;
            }
        } else if plan.is_deprecated() && !self.include_deprecated {
            return false;
        }
        if let Some(plan_type) = self.plan_type {
            if plan.plan_type != plan_type {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                plan.version.contains(needle) || plan.summary.contains(needle)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(version: &str, status: PlanStatus) -> Plan {
        let mut p = Plan::new(
            format!("id-{}", version),
            version.to_string(),
            "25.8".to_string(),
            PlanType::Release,
            format!("summary {}", version),
        );
        p.status = status;
        p
    }

    #[test]
    fn test_status_round_trip_through_str() {
        for status in PlanStatus::ALL {
            assert_eq!(status.as_str().parse::<PlanStatus>().unwrap(), status);
        }
        assert!("archived".parse::<PlanStatus>().is_err());
    }

    #[test]
    fn test_plan_type_serializes_capitalized() {
        let json = serde_json::to_string(&PlanType::Patch).unwrap();
        assert_eq!(json, "\"Patch\"");
        assert_eq!(PlanType::Patch.expected_segments(), 4);
    }

    #[test]
    fn test_filter_hides_deprecated_by_default() {
        let deprecated = plan("25.8.0", PlanStatus::Deprecated);
        let released = plan("25.8.1", PlanStatus::Released);

        let filter = PlanFilter::default();
        assert!(!filter.matches(&deprecated));
        assert!(filter.matches(&released));

        let explicit = PlanFilter {
            status: Some(PlanStatus::Deprecated),
            ..Default::default()
        };
        assert!(explicit.matches(&deprecated));

        let all = PlanFilter {
            include_deprecated: true,
            ..Default::default()
        };
        assert!(all.matches(&deprecated));
    }

    #[test]
    fn test_filter_search_matches_version_or_summary() {
        let p = plan("25.8.1", PlanStatus::Draft);
        let by_version = PlanFilter {
            search: Some("8.1".to_string()),
            ..Default::default()
        };
        let by_summary = PlanFilter {
            search: Some("summary".to_string()),
            ..Default::default()
        };
        let miss = PlanFilter {
            search: Some("25.10".to_string()),
            ..Default::default()
        };
        assert!(by_version.matches(&p));
        assert!(by_summary.matches(&p));
        assert!(!miss.matches(&p));
    }
}
