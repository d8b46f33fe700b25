//! Region commands

use clap::{Args, Subcommand};
use vertrack_core::model::{PinUpdate, RegionArea};
use vertrack_engine::commands::engine_command::EngineCommand;
use vertrack_engine::commands::engine_query::EngineQuery;

use super::Request;

#[derive(Debug, Args)]
pub struct RegionArgs {
    #[command(subcommand)]
    pub command: RegionCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegionCommand {
    /// List regions with their pins and drift
    List {
        /// domestic, apac, africa or latam
        #[arg(long)]
        area: Option<RegionArea>,
    },
    /// Show one region by id or name
    Get { region: String },
    /// Pin a region to a plan or change its readiness flags
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    pub region: String,

    /// Plan id or version
    #[arg(long)]
    pub plan: Option<String>,

    #[arg(long)]
    pub backend_ready: Option<bool>,

    #[arg(long)]
    pub frontend_ready: Option<bool>,
}

pub fn request(args: RegionArgs) -> Request {
    match args.command {
        RegionCommand::List { area } => Request::Query(EngineQuery::RegionList { area }),
        RegionCommand::Get { region } => Request::Query(EngineQuery::RegionGet {
            region_ref: region,
        }),
        RegionCommand::Set(set) => Request::Command(EngineCommand::RegionSetVersion {
            region_ref: set.region,
            update: PinUpdate {
                plan_id: set.plan,
                backend_ready: set.backend_ready,
                frontend_ready: set.frontend_ready,
            },
        }),
    }
}
