//! Manifest and plan basic-info diff.
//!
//! ## Entry points
//!
//! ```ignore
//! use vertrack_core::diff::{diff_manifests, diff_plan_info};
//!
//! let manifest_diff = diff_manifests(&manifest_a, &manifest_b);
//! let info_changes = diff_plan_info(&plan_a, &plan_b);
//! let summary = vertrack_core::diff::render_human_summary(&comparison);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: the frontend entry comes first, then components sorted by name.
//! - **Reflexivity**: diffing a manifest against itself yields no entries.
//! - **Set semantics**: requirement and bug lists are compared ignoring order and repeats.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{diff_manifests, diff_plan_info};
pub use human_summary::render_human_summary;
pub use model::{
    DiffChangeType, DiffEntry, FieldChange, ManifestDiff, PlanComparison, PlanRef,
    ABSENT_VERSION, FRONTEND_ENTRY,
};
