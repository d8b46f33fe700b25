//! In-memory domain operations.
//!
//! Each function validates its input and mutates or builds plain model
//! values. Persistence and audit are the engine's job.

pub mod manifest_ops;
pub mod plan_ops;
pub mod region_ops;

pub use manifest_ops::{apply_patch, build_manifest, copy_manifest, copy_plan_draft};
pub use plan_ops::{apply_update, deprecate, new_plan, transition_status};
pub use region_ops::apply_pin_update;
