//! Rewrite Demo - run the rewrite core on sample plans
//!
//! # Usage
//!
//! ```bash
//! cargo run --package quarry-playground --bin rewrite-demo -- --help
//! cargo run --package quarry-playground --bin rewrite-demo -- cast --trace
//! cargo run --package quarry-playground --bin rewrite-demo -- demo --config quarry.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use common_config::QuarryConfig;
use common_error::QuarryResult;
use quarry_core::BuiltinCatalog;
use quarry_logical::OptExpression;
use quarry_optimizer::{Optimizer, OptimizerContext, RuleSet};

use quarry_playground::{case_when_plan, cast_plan, decorrelate_plan, print_header, print_rewrite};

/// Rewrite Demo CLI.
#[derive(Parser, Debug)]
#[command(name = "rewrite-demo")]
#[command(about = "Run the Quarry rewrite rules on sample plans")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Record and print before/after plans for every rule application
    #[arg(long, global = true)]
    trace: bool,

    /// Maximum number of rewrite passes
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Load a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// `stringColumn = 5`: implicit casts to a common type
    Cast,

    /// CASE branches cast to the declared result type
    CaseWhen,

    /// Push a correlated filter below a project under Apply
    Decorrelate,

    /// Run all of the above
    Demo,
}

fn main() -> QuarryResult<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => QuarryConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => QuarryConfig::default(),
    };
    if args.trace {
        config.rewrite.enable_trace = true;
    }
    if let Some(max) = args.max_iterations {
        config.rewrite.max_iterations = max;
    }

    let ctx = OptimizerContext::new(Arc::new(BuiltinCatalog::with_builtins()))
        .with_config(config.rewrite.clone());
    let optimizer = Optimizer::with_config(RuleSet::default_rules(), config.rewrite);

    match args.command {
        Commands::Cast => run("Implicit cast", cast_plan(), &optimizer, &ctx)?,
        Commands::CaseWhen => run("CASE WHEN", case_when_plan()?, &optimizer, &ctx)?,
        Commands::Decorrelate => run("Decorrelation", decorrelate_plan(), &optimizer, &ctx)?,
        Commands::Demo => {
            run("Implicit cast", cast_plan(), &optimizer, &ctx)?;
            run("CASE WHEN", case_when_plan()?, &optimizer, &ctx)?;
            run("Decorrelation", decorrelate_plan(), &optimizer, &ctx)?;
        }
    }

    Ok(())
}

fn run(
    title: &str,
    plan: OptExpression,
    optimizer: &Optimizer,
    ctx: &OptimizerContext,
) -> QuarryResult<()> {
    print_header(title);
    let result = optimizer.optimize(plan.clone(), ctx)?;
    print_rewrite(&plan, &result, optimizer.config().enable_trace);
    Ok(())
}
