//! Read-only queries over loaded model values.
//!
//! Results are deterministically ordered.

pub mod plan_queries;

pub use plan_queries::{filter_plans, newest_first};
