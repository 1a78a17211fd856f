//! # Build Subcommand
//!
//! Runs the full pipeline: validate every record of every configured
//! collection and write the accepted records as per-category JSON
//! catalogs.
//!
//! ## Usage
//!
//! ```bash
//! # Build from armory.yaml (or the built-in dual red/blue layout):
//! armory build
//!
//! # Build one ad-hoc collection:
//! armory build --source data/blue --output blue.json --category blue
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use armory_core::Category;
use armory_pipeline::{BuildConfig, CatalogBuilder};

use crate::load_config;

/// Arguments for the build subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Source directory for a single ad-hoc collection (bypasses the
    /// config file; requires --output).
    #[arg(long, requires = "output")]
    pub source: Option<PathBuf>,

    /// Catalog destination for the ad-hoc collection.
    #[arg(long, requires = "source")]
    pub output: Option<PathBuf>,

    /// Category of the ad-hoc collection.
    #[arg(long, default_value = "blue")]
    pub category: Category,
}

/// Execute the build subcommand. Returns the process exit code:
/// 0 when every record was accepted, 1 when any file was rejected.
pub fn run_build(args: &BuildArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = match (&args.source, &args.output) {
        (Some(source), Some(output)) => BuildConfig::single(args.category, source, output),
        _ => load_config(config_path)?,
    };
    let plans = config
        .into_plans()
        .context("invalid build configuration")?;

    let summary = CatalogBuilder::new().run(&plans)?;
    Ok(u8::from(summary.has_rejections()))
}
