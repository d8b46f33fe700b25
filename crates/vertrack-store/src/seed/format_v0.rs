//! Seed Format v0 schema
//!
//! Defines the YAML structure for seed import. Versions and version lines
//! must be quoted in YAML so they are read as strings.

use serde::{Deserialize, Serialize};
use vertrack_core::model::{ManifestDraft, PlanStatus, PlanType};

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// System config entries, applied with upsert
    #[serde(default)]
    pub config: Vec<SeedConfig>,

    /// Plans to create, each with an optional manifest
    #[serde(default)]
    pub plans: Vec<SeedPlan>,

    /// Region pins, by region name and plan version
    #[serde(default)]
    pub pins: Vec<SeedPin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub key: String,
    pub value: String,
}

/// Plan definition in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPlan {
    pub version: String,

    /// Inferred from the segment count when absent
    #[serde(rename = "type", default)]
    pub plan_type: Option<PlanType>,

    /// Defaults to `draft`
    #[serde(default)]
    pub status: Option<PlanStatus>,

    pub summary: String,

    #[serde(default)]
    pub related_requirements: Vec<String>,

    #[serde(default)]
    pub related_bugs: Vec<String>,

    #[serde(default)]
    pub manifest: Option<ManifestDraft>,
}

/// Region pin in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPin {
    /// Region name from the catalog
    pub region: String,

    /// Plan version, from this seed or already stored
    pub version: String,

    #[serde(default)]
    pub backend_ready: bool,

    #[serde(default)]
    pub frontend_ready: bool,
}
