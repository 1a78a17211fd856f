//! # Catalog Builder
//!
//! Iterates the source files of one or more collections, invokes the
//! loader and validator per file, partitions results into accepted
//! records and per-file rejection reports, and writes each accepted
//! collection as one JSON catalog.
//!
//! The single-collection and dual-category pipelines are the same code
//! here: a run is a list of [`CollectionPlan`]s, each with its own
//! source directory, tag registry, and output destination.
//!
//! File names are sorted lexicographically before ids are assigned, so
//! ids are deterministic for a given directory content and dense over
//! the processed list.

use std::path::{Path, PathBuf};

use thiserror::Error;

use armory_core::{Category, Record, Slug, TagRegistry};

use crate::loader::{load_record, LoadError};
use crate::report;
use crate::validator::{FieldSchema, RecordIdentity, RecordValidator, Violation};

/// Everything needed to build one collection.
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    /// Category this collection belongs to.
    pub category: Category,
    /// Directory holding the per-record YAML files.
    pub source_dir: PathBuf,
    /// Destination of the serialized catalog.
    pub output_path: PathBuf,
    /// The tag registry records of this collection resolve against.
    pub registry: TagRegistry,
}

impl CollectionPlan {
    /// Build a plan using the category's built-in registry.
    pub fn new(
        category: Category,
        source_dir: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            category,
            source_dir: source_dir.into(),
            output_path: output_path.into(),
            registry: TagRegistry::builtin(category),
        }
    }

    /// Replace the registry, e.g. with one from a config file.
    pub fn with_registry(mut self, registry: TagRegistry) -> Self {
        self.registry = registry;
        self
    }
}

/// One rejected source file: its path, every violation found, and the
/// raw key set the file supplied (for debugging typos).
#[derive(Debug)]
pub struct RejectedFile {
    /// Path of the source file.
    pub path: PathBuf,
    /// Every reason the file was rejected.
    pub violations: Vec<Violation>,
    /// Top-level keys the raw record had. Empty when the file never
    /// parsed.
    pub supplied_fields: Vec<String>,
}

/// The result of building one collection.
#[derive(Debug)]
pub struct CollectionOutcome {
    /// Category of the collection.
    pub category: Category,
    /// Where the catalog was (or would be) written.
    pub output_path: PathBuf,
    /// Accepted records, in processing order.
    pub accepted: Vec<Record>,
    /// Rejected files with their violation lists.
    pub rejected: Vec<RejectedFile>,
}

impl CollectionOutcome {
    /// Number of accepted records.
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Number of rejected files.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Aggregated result of one run over a plan list.
#[derive(Debug)]
pub struct RunSummary {
    /// Per-collection outcomes, in plan order.
    pub collections: Vec<CollectionOutcome>,
}

impl RunSummary {
    /// Total accepted records across all collections.
    pub fn total_accepted(&self) -> usize {
        self.collections.iter().map(CollectionOutcome::accepted_count).sum()
    }

    /// Total rejected files across all collections.
    pub fn total_rejected(&self) -> usize {
        self.collections.iter().map(CollectionOutcome::rejected_count).sum()
    }

    /// True when any file in any collection was rejected.
    pub fn has_rejections(&self) -> bool {
        self.total_rejected() > 0
    }
}

/// Run-level fault. Unlike per-file errors, these abort the run.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The source directory could not be listed.
    #[error("cannot list source directory {path}: {source}")]
    ListDir {
        /// The directory that failed to list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog could not be written.
    #[error("cannot write catalog {path}: {source}")]
    WriteOutput {
        /// The destination that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The accepted records could not be serialized.
    #[error("cannot serialize catalog {path}: {source}")]
    Serialize {
        /// The destination being written.
        path: PathBuf,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}

/// Builds catalogs from collection plans.
#[derive(Debug)]
pub struct CatalogBuilder {
    schema: FieldSchema,
    emit_output: bool,
}

impl CatalogBuilder {
    /// A builder that writes catalogs to their destinations.
    pub fn new() -> Self {
        Self {
            schema: FieldSchema::tool(),
            emit_output: true,
        }
    }

    /// A builder that validates and reports but writes nothing.
    pub fn dry_run() -> Self {
        Self {
            schema: FieldSchema::tool(),
            emit_output: false,
        }
    }

    /// Process every plan in order. Each collection gets an
    /// independently scoped registry and output; a grand total is
    /// printed after multi-collection runs.
    pub fn run(&self, plans: &[CollectionPlan]) -> Result<RunSummary, BuildError> {
        let mut collections = Vec::with_capacity(plans.len());
        for plan in plans {
            let outcome = self.process_collection(plan)?;
            if self.emit_output {
                write_catalog(&outcome)?;
            }
            report::print_collection_tally(&outcome);
            collections.push(outcome);
        }
        let summary = RunSummary { collections };
        if plans.len() > 1 {
            report::print_grand_total(&summary);
        }
        Ok(summary)
    }

    fn process_collection(&self, plan: &CollectionPlan) -> Result<CollectionOutcome, BuildError> {
        tracing::info!(
            category = %plan.category,
            source = %plan.source_dir.display(),
            "building collection"
        );

        let file_names = list_record_files(&plan.source_dir)?;
        let validator = RecordValidator::new(self.schema.clone(), &plan.registry);

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for (index, file_name) in file_names.iter().enumerate() {
            let path = plan.source_dir.join(file_name);
            let identity = RecordIdentity::new(Slug::from_file_name(file_name), index as u64);
            tracing::debug!(file = %path.display(), slug = %identity.slug, "processing record");

            let result = match load_record(&path) {
                Ok(raw) => {
                    let supplied: Vec<String> = raw.keys().cloned().collect();
                    validator
                        .validate(raw, &identity)
                        .map_err(|violations| (violations, supplied))
                }
                Err(e) => Err((vec![load_violation(e)], Vec::new())),
            };

            match result {
                Ok(record) => {
                    report::print_accepted(&record);
                    accepted.push(record);
                }
                Err((violations, supplied_fields)) => {
                    let file = RejectedFile {
                        path,
                        violations,
                        supplied_fields,
                    };
                    report::print_rejection(&file);
                    rejected.push(file);
                }
            }
        }

        Ok(CollectionOutcome {
            category: plan.category,
            output_path: plan.output_path.clone(),
            accepted,
            rejected,
        })
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A load failure is recorded as a single file-structure violation.
fn load_violation(error: LoadError) -> Violation {
    Violation::file(format!("failed loading record: {error}"))
}

/// List the record file names of a source directory: regular files
/// with a `.yaml`/`.yml` extension (case-insensitive), sorted
/// lexicographically.
fn list_record_files(dir: &Path) -> Result<Vec<String>, BuildError> {
    let entries = std::fs::read_dir(dir).map_err(|source| BuildError::ListDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BuildError::ListDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if has_record_extension(name) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn has_record_extension(name: &str) -> bool {
    matches!(
        name.rsplit_once('.'),
        Some((_, ext)) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
    )
}

/// Serialize the accepted records of one collection as a JSON array,
/// wholesale, UTF-8.
fn write_catalog(outcome: &CollectionOutcome) -> Result<(), BuildError> {
    if let Some(parent) = outcome.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| BuildError::WriteOutput {
                path: outcome.output_path.clone(),
                source,
            })?;
        }
    }

    let json = serde_json::to_vec(&outcome.accepted).map_err(|source| BuildError::Serialize {
        path: outcome.output_path.clone(),
        source,
    })?;

    std::fs::write(&outcome.output_path, json).map_err(|source| BuildError::WriteOutput {
        path: outcome.output_path.clone(),
        source,
    })?;

    tracing::debug!(
        catalog = %outcome.output_path.display(),
        records = outcome.accepted.len(),
        "catalog written"
    );
    Ok(())
}
