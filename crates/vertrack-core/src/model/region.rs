use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;

/// Geographic grouping of deployment sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionArea {
    Domestic,
    Apac,
    Africa,
    Latam,
}

impl RegionArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionArea::Domestic => "domestic",
            RegionArea::Apac => "apac",
            RegionArea::Africa => "africa",
            RegionArea::Latam => "latam",
        }
    }
}

impl FromStr for RegionArea {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic" => Ok(RegionArea::Domestic),
            "apac" => Ok(RegionArea::Apac),
            "africa" => Ok(RegionArea::Africa),
            "latam" => Ok(RegionArea::Latam),
            other => Err(TrackerError::InvalidValue {
                field: "area".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RegionArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployment site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    /// Unique display name
    pub name: String,
    pub area: RegionArea,
    /// Gray regions receive new versions first
    pub is_gray: bool,
}

/// Current pin of a region to a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionVersion {
    pub region_id: String,
    pub plan_id: String,
    pub backend_ready: bool,
    pub frontend_ready: bool,
    pub last_updated_at: DateTime<Utc>,
}

/// Pin change; unset fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinUpdate {
    pub plan_id: Option<String>,
    pub backend_ready: Option<bool>,
    pub frontend_ready: Option<bool>,
}

impl PinUpdate {
    pub fn to_plan(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: Some(plan_id.into()),
            ..Default::default()
        }
    }
}
