//! Manifest commands
//!
//! Drafts and patches are read from JSON files shaped like the
//! `ManifestDraft` / `ManifestPatch` types.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use vertrack_core::errors::ExError;
use vertrack_core::model::PlanType;
use vertrack_engine::commands::engine_command::EngineCommand;
use vertrack_engine::commands::engine_query::EngineQuery;

use super::{read_json, Request};

#[derive(Debug, Args)]
pub struct ManifestArgs {
    #[command(subcommand)]
    pub command: ManifestCommand,
}

#[derive(Debug, Subcommand)]
pub enum ManifestCommand {
    /// Show the manifest of a plan
    Get { plan: String },
    /// Attach a manifest to a plan that has none
    Create {
        plan: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Edit a manifest; a `components` array replaces the whole set
    Update {
        plan: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Create a new draft plan from an existing plan's manifest
    Copy(CopyArgs),
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    pub source: String,

    pub new_version: String,

    #[arg(long = "type")]
    pub plan_type: Option<PlanType>,

    /// Defaults to "Copied from <source version>"
    #[arg(long)]
    pub summary: Option<String>,
}

pub fn request(args: ManifestArgs) -> Result<Request, ExError> {
    let request = match args.command {
        ManifestCommand::Get { plan } => {
            Request::Query(EngineQuery::ManifestGet { plan_ref: plan })
        }
        ManifestCommand::Create { plan, file } => {
            Request::Command(EngineCommand::ManifestCreate {
                plan_ref: plan,
                draft: read_json(&file)?,
            })
        }
        ManifestCommand::Update { plan, file } => {
            Request::Command(EngineCommand::ManifestUpdate {
                plan_ref: plan,
                patch: read_json(&file)?,
            })
        }
        ManifestCommand::Copy(copy) => Request::Command(EngineCommand::ManifestCopy {
            source_ref: copy.source,
            new_version: copy.new_version,
            plan_type: copy.plan_type,
            summary: copy.summary,
        }),
    };
    Ok(request)
}
