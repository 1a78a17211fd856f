//! # armory CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity maps onto a tracing `EnvFilter`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use armory_cli::build::{run_build, BuildArgs};
use armory_cli::check::{run_check, CheckArgs};

/// Armory catalog generator.
///
/// Validates the per-tool YAML records of the Armory reference site and
/// writes the per-category JSON catalogs the front-end consumes.
#[derive(Parser, Debug)]
#[command(name = "armory", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the build configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate every record and write the catalogs.
    Build(BuildArgs),

    /// Validate and report without writing anything.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Build(args) => run_build(&args, cli.config.as_deref()),
        Commands::Check(args) => run_check(&args, cli.config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
