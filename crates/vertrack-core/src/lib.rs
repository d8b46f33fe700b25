//! Vertrack Core - release version tracking domain
//!
//! This crate provides the pure domain layer for Vertrack, including:
//! - Plan, manifest, region, config and audit models
//! - Version parsing, comparison and drift classification
//! - Manifest and plan basic-info diff
//! - Dashboard aggregation over an explicit version-line config
//! - Validation rules and in-memory operations
//! - The error and structured logging facilities shared by every crate
//!
//! Nothing here touches storage; callers load data and pass it in.

pub mod dashboard;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod queries;
pub mod rules;
pub mod version;

// Re-export commonly used types
pub use dashboard::{aggregate, region_drift, Dashboard, RegionDrift, VersionLineStats};
pub use diff::{diff_manifests, diff_plan_info, ManifestDiff, PlanComparison};
pub use errors::{ExError, ExErrorKind, Result, TrackerError};
pub use model::{Catalog, Manifest, Plan, Region, RegionVersion, VersionLineConfig};
pub use version::{classify, classify_versions, compare_versions, Drift, Version};
