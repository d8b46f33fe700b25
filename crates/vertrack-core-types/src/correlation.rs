//! Correlation types for request tracking
//!
//! Every mutating command runs under an [`OperationContext`] that names the
//! operator recorded in the audit log and the request id carried by errors
//! and log events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operator recorded when the caller does not identify itself
pub const DEFAULT_OPERATOR: &str = "system";

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through command boundaries
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub request_id: RequestId,
    pub operator: String,
}

impl OperationContext {
    /// Create a context for the default operator with a fresh RequestId
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            operator: DEFAULT_OPERATOR.to_string(),
        }
    }

    /// Create a context acting on behalf of a named operator
    pub fn for_operator(operator: impl Into<String>) -> Self {
        let operator = operator.into();
        let operator = if operator.trim().is_empty() {
            DEFAULT_OPERATOR.to_string()
        } else {
            operator
        };
        Self {
            request_id: RequestId::new(),
            operator,
        }
    }

    /// Replace the RequestId (e.g. when propagated from an outer layer)
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
