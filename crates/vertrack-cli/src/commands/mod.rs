//! Subcommand argument types and their translation into engine requests.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use vertrack_core::errors::{ExError, ExErrorKind};
use vertrack_engine::commands::engine_command::EngineCommand;
use vertrack_engine::commands::engine_query::EngineQuery;

pub mod config;
pub mod diff;
pub mod manifest;
pub mod plan;
pub mod region;
pub mod seed;

/// A parsed invocation ready for the engine
#[derive(Debug)]
pub enum Request {
    Command(EngineCommand),
    Query(EngineQuery),
}

/// Read a JSON document (manifest drafts and patches)
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ExError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_json")
            .with_entity_id(path.display().to_string())
            .with_message(e.to_string())
    })?;
    serde_json::from_str(&content).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("read_json")
            .with_entity_id(path.display().to_string())
            .with_message(e.to_string())
    })
}

pub fn json_value<T: Serialize>(value: &T) -> Result<serde_json::Value, ExError> {
    serde_json::to_value(value).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("render_response")
            .with_message(e.to_string())
    })
}
