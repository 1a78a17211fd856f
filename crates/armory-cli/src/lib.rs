//! # armory-cli — Armory Command-Line Interface
//!
//! Subcommand handlers for the `armory` binary.
//!
//! ## Subcommands
//!
//! - `build` — validate every record and write the per-category catalogs
//! - `check` — the same validation pass and report, writing nothing
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the pipeline: handlers resolve
//!   a [`BuildConfig`] and delegate to `armory-pipeline`.
//! - Exit codes: 0 when every record was accepted, 1 when any file was
//!   rejected (so CI can gate on a clean catalog), 2 on run-level
//!   failure.

use std::path::Path;

use anyhow::{Context, Result};

use armory_pipeline::BuildConfig;

pub mod build;
pub mod check;

/// Config file picked up from the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "armory.yaml";

/// Resolve the build configuration: an explicit `--config` path, else
/// `armory.yaml` in the working directory, else the built-in dual
/// red/blue layout.
pub fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    match path {
        Some(p) => BuildConfig::from_file(p)
            .with_context(|| format!("cannot load configuration {}", p.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                BuildConfig::from_file(default)
                    .with_context(|| format!("cannot load configuration {DEFAULT_CONFIG_FILE}"))
            } else {
                Ok(BuildConfig::default())
            }
        }
    }
}
