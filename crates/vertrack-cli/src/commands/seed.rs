//! Seed commands
//!
//! Usage: vertrack seed catalog [--file <PATH>] | vertrack seed import <PATH>

use clap::{Args, Subcommand};
use std::path::PathBuf;
use vertrack_core::errors::ExError;
use vertrack_core::model::Catalog;
use vertrack_engine::commands::engine_command::EngineCommand;
use vertrack_store::seed::{default_catalog, parse_catalog_file};

use super::Request;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Upsert the catalog's regions
    Catalog {
        /// Catalog YAML replacing the embedded default
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Import plans, manifests, pins and config from a seed YAML file
    Import { path: PathBuf },
}

/// The catalog this invocation validates against
pub fn catalog(args: &SeedArgs) -> Result<Catalog, ExError> {
    match &args.command {
        SeedCommand::Catalog { file: Some(path) } => parse_catalog_file(path),
        _ => default_catalog(),
    }
}

pub fn request(args: SeedArgs) -> Request {
    match args.command {
        SeedCommand::Catalog { .. } => Request::Command(EngineCommand::SeedCatalog),
        SeedCommand::Import { path } => Request::Command(EngineCommand::SeedImport { path }),
    }
}
