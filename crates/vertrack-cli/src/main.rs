//! Vertrack CLI
//!
//! Command-line interface for release version tracking. Every command prints
//! an `ApiResponse` JSON envelope and exits 1 on failure.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vertrack_core::errors::ExError;
use vertrack_core::logging_facility::{self, Profile};
use vertrack_core_types::OperationContext;
use vertrack_engine::commands::engine_command::apply_engine_command;
use vertrack_engine::commands::engine_query::{apply_engine_query, EngineQueryResult};
use vertrack_engine::response::ApiResponse;

mod commands;

use commands::{json_value, Request};

#[derive(Debug, Parser)]
#[command(name = "vertrack")]
#[command(about = "Vertrack - Release version tracking", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = ".vertrack/store.db")]
    db: PathBuf,

    /// Log output: dev, json or off
    #[arg(long, global = true, default_value = "off")]
    log: Profile,

    /// Operator recorded in audit rows
    #[arg(long, global = true, default_value = "")]
    operator: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan operations
    Plan(commands::plan::PlanArgs),
    /// Manifest operations
    Manifest(commands::manifest::ManifestArgs),
    /// Region pins and drift
    Region(commands::region::RegionArgs),
    /// System config entries
    Config(commands::config::ConfigArgs),
    /// Aggregate statistics and recent audit entries
    Dashboard,
    /// Compare two plans
    Diff(commands::diff::DiffArgs),
    /// Catalog seeding and data import
    Seed(commands::seed::SeedArgs),
}

/// What to print on success
enum Rendered {
    Json(serde_json::Value),
    Markdown(String),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log);

    match run(cli) {
        Ok(Rendered::Markdown(text)) => print!("{}", text),
        Ok(Rendered::Json(value)) => print_response(&ApiResponse::ok(value)),
        Err(e) => {
            print_response(&ApiResponse::<serde_json::Value>::err(&e));
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<Rendered, ExError> {
    let mut markdown = false;
    let catalog = match &cli.command {
        Commands::Seed(args) => commands::seed::catalog(args)?,
        _ => vertrack_store::seed::default_catalog()?,
    };

    let request = match cli.command {
        Commands::Plan(args) => commands::plan::request(args)?,
        Commands::Manifest(args) => commands::manifest::request(args)?,
        Commands::Region(args) => commands::region::request(args),
        Commands::Config(args) => commands::config::request(args),
        Commands::Dashboard => Request::Query(
            vertrack_engine::commands::engine_query::EngineQuery::Dashboard,
        ),
        Commands::Diff(args) => {
            markdown = args.markdown;
            commands::diff::request(args)
        }
        Commands::Seed(args) => commands::seed::request(args),
    };

    let mut conn = vertrack_store::db::open_store(&cli.db)?;
    let ctx = OperationContext::for_operator(cli.operator);
    tracing::debug!(request_id = %ctx.request_id, db = %cli.db.display(), "cli request");

    match request {
        Request::Command(cmd) => {
            let result = apply_engine_command(cmd, &mut conn, &ctx, &catalog)?;
            json_value(&result).map(Rendered::Json)
        }
        Request::Query(query) => match apply_engine_query(query, &conn)? {
            EngineQueryResult::Compare(compare) if markdown => {
                Ok(Rendered::Markdown(compare.human_summary))
            }
            result => json_value(&result).map(Rendered::Json),
        },
    }
}

fn print_response(response: &ApiResponse<serde_json::Value>) {
    match serde_json::to_string_pretty(response) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
