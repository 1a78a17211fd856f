//! # Check Subcommand
//!
//! The same validation pass and rejection report as `build`, but
//! nothing is written: use it to gate contributions before the
//! catalogs are regenerated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use armory_core::Category;
use armory_pipeline::{BuildConfig, CatalogBuilder};

use crate::load_config;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Source directory for a single ad-hoc collection (bypasses the
    /// config file).
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Category of the ad-hoc collection.
    #[arg(long, default_value = "blue")]
    pub category: Category,
}

/// Execute the check subcommand. Returns the process exit code:
/// 0 when every record was accepted, 1 when any file was rejected.
pub fn run_check(args: &CheckArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = match &args.source {
        // The destination is never written in a check; a placeholder
        // keeps the plan shape uniform.
        Some(source) => BuildConfig::single(
            args.category,
            source,
            PathBuf::from(format!("{}.json", args.category)),
        ),
        None => load_config(config_path)?,
    };
    let plans = config
        .into_plans()
        .context("invalid build configuration")?;

    let summary = CatalogBuilder::dry_run().run(&plans)?;
    Ok(u8::from(summary.has_rejections()))
}
