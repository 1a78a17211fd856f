//! # armory-pipeline — Validate-and-Transform Pipeline
//!
//! Single-pass build pipeline for the Armory catalogs. For each
//! configured collection it lists the source directory, loads every
//! YAML record file, runs the accumulating validator, writes the
//! accepted records as one JSON catalog, and reports every rejected
//! file with the full list of reasons.
//!
//! Data flow:
//!
//! ```text
//! directory listing -> loader (raw mapping)
//!                   -> validator (record | violations)
//!                   -> builder (catalog JSON + rejection report)
//! ```
//!
//! ## Crate Policy
//!
//! - Per-file errors are contained to that file; the run only aborts on
//!   run-level I/O faults (unlistable source directory, unwritable
//!   output).
//! - The human-readable report goes to stdout (it is program output);
//!   `tracing` carries diagnostics only.

pub mod catalog;
pub mod config;
pub mod loader;
pub mod report;
pub mod validator;

pub use catalog::{
    BuildError, CatalogBuilder, CollectionOutcome, CollectionPlan, RejectedFile, RunSummary,
};
pub use config::{BuildConfig, CollectionConfig, ConfigError};
pub use loader::{load_record, LoadError, RawRecord};
pub use validator::{FieldSchema, RecordIdentity, RecordValidator, Violation, ViolationScope};
