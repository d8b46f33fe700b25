//! Vertrack Engine - Orchestration layer
//!
//! Coordinates core domain logic with the SQLite store: every public
//! command resolves references, runs inside a transaction, writes audit
//! rows and owns lifecycle logging.

pub mod commands;
pub mod response;
