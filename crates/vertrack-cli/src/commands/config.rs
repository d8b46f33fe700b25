//! Config commands
//!
//! Usage: vertrack config list | vertrack config set <KEY> <VALUE>

use clap::{Args, Subcommand};
use vertrack_engine::commands::engine_command::EngineCommand;
use vertrack_engine::commands::engine_query::EngineQuery;

use super::Request;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// List all entries
    List,
    /// Insert or overwrite an entry, e.g. `baseline_25.8 25.8.2`
    Set { key: String, value: String },
}

pub fn request(args: ConfigArgs) -> Request {
    match args.command {
        ConfigCommand::List => Request::Query(EngineQuery::ConfigList),
        ConfigCommand::Set { key, value } => {
            Request::Command(EngineCommand::ConfigUpsert { key, value })
        }
    }
}
