//! Command line front end for the tipple ranking pipeline.
//!
//! The pipeline itself is a pure library; this binary supplies what a real
//! deployment's request handler would: file loading, clock resolution, and
//! JSON output.

mod rank;
mod validate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tipple-cli")]
#[command(about = "Happy-hour deal ranking from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank deal collections for a viewer position and instant
    Rank(rank::RankArgs),
    /// Check a snapshot and catalog for data problems
    Validate(validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Rank(args) => rank::run(&args),
        Commands::Validate(args) => validate::run(&args),
    }
}
