//! Core types shared across Vertrack facilities
//!
//! This crate provides foundational types used by the error, logging and
//! audit facilities:
//!
//! - **Correlation types**: RequestId, OperationContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{OperationContext, RequestId, DEFAULT_OPERATOR};
