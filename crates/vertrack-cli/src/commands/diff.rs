//! Plan comparison command
//!
//! Usage: vertrack diff <PLAN_A> <PLAN_B> [--markdown]

use clap::Args;
use vertrack_engine::commands::engine_query::EngineQuery;

use super::Request;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Plan id or version
    pub plan_a: String,

    /// Plan id or version
    pub plan_b: String,

    /// Print the Markdown summary instead of JSON
    #[arg(long)]
    pub markdown: bool,
}

pub fn request(args: DiffArgs) -> Request {
    Request::Query(EngineQuery::PlansCompare {
        plan_a: args.plan_a,
        plan_b: args.plan_b,
    })
}
