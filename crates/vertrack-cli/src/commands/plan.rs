//! Plan commands
//!
//! Usage: vertrack plan <create|get|list|update|status|delete> ...

use std::path::PathBuf;

use clap::{Args, Subcommand};
use vertrack_core::errors::ExError;
use vertrack_core::model::{ManifestDraft, PlanDraft, PlanFilter, PlanStatus, PlanType, PlanUpdate};
use vertrack_engine::commands::engine_command::EngineCommand;
use vertrack_engine::commands::engine_query::EngineQuery;

use super::{read_json, Request};

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(subcommand)]
    pub command: PlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Create a draft plan
    Create(CreateArgs),
    /// Show a plan with its manifest and pinned regions
    Get { plan: String },
    /// List plans, newest first
    List(ListArgs),
    /// Edit summary, requirements or bugs
    Update(UpdateArgs),
    /// Set a plan's status
    Status { plan: String, status: PlanStatus },
    /// Soft delete: mark a plan deprecated
    Delete { plan: String },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub version: String,

    #[arg(long)]
    pub summary: String,

    /// Release or Patch; inferred from the version when omitted
    #[arg(long = "type")]
    pub plan_type: Option<PlanType>,

    #[arg(long = "requirement")]
    pub requirements: Vec<String>,

    #[arg(long = "bug")]
    pub bugs: Vec<String>,

    /// JSON manifest draft created with the plan
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<PlanStatus>,

    #[arg(long = "type")]
    pub plan_type: Option<PlanType>,

    /// Substring of version or summary
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub include_deprecated: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub plan: String,

    #[arg(long)]
    pub summary: Option<String>,

    /// Comma-separated; replaces the whole list
    #[arg(long, value_delimiter = ',')]
    pub requirements: Option<Vec<String>>,

    /// Comma-separated; replaces the whole list
    #[arg(long, value_delimiter = ',')]
    pub bugs: Option<Vec<String>>,
}

pub fn request(args: PlanArgs) -> Result<Request, ExError> {
    let request = match args.command {
        PlanCommand::Create(create) => {
            let manifest = create.manifest.as_deref().map(read_json::<ManifestDraft>).transpose()?;
            Request::Command(EngineCommand::PlanCreate {
                draft: PlanDraft {
                    version: create.version,
                    plan_type: create.plan_type,
                    summary: create.summary,
                    related_requirements: create.requirements,
                    related_bugs: create.bugs,
                },
                manifest,
            })
        }
        PlanCommand::Get { plan } => Request::Query(EngineQuery::PlanGet { plan_ref: plan }),
        PlanCommand::List(list) => Request::Query(EngineQuery::PlanList(PlanFilter {
            status: list.status,
            plan_type: list.plan_type,
            search: list.search,
            include_deprecated: list.include_deprecated,
        })),
        PlanCommand::Update(update) => Request::Command(EngineCommand::PlanUpdate {
            plan_ref: update.plan,
            update: PlanUpdate {
                summary: update.summary,
                related_requirements: update.requirements.map(non_empty),
                related_bugs: update.bugs.map(non_empty),
            },
        }),
        PlanCommand::Status { plan, status } => Request::Command(EngineCommand::PlanSetStatus {
            plan_ref: plan,
            status,
        }),
        PlanCommand::Delete { plan } => {
            Request::Command(EngineCommand::PlanDeprecate { plan_ref: plan })
        }
    };
    Ok(request)
}

// `--bugs ""` clears the list
fn non_empty(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
