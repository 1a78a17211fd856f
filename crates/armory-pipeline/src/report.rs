//! # Reporter
//!
//! Human-readable program output for a build run, printed to stdout in
//! the format the site's contributors already grep for: one `Adding:`
//! line per accepted record, a block per rejected file (path, every
//! violation, the supplied key set), a `TOOLS/ERRORS` tally per
//! collection, and a grand total for multi-collection runs.
//!
//! Diagnostics belong to `tracing`; nothing here should move there.

use armory_core::Record;

use crate::catalog::{CollectionOutcome, RejectedFile, RunSummary};

/// One line per accepted record.
pub fn print_accepted(record: &Record) {
    println!("Adding: {}", record.slug);
}

/// The rejection block for one file: path, each violation on its own
/// line, and the raw key set for debugging field-name typos.
pub fn print_rejection(file: &RejectedFile) {
    println!("Errors with file: {}", file.path.display());
    for violation in &file.violations {
        println!("{violation}");
    }
    if !file.supplied_fields.is_empty() {
        println!("Supplied fields: {}", file.supplied_fields.join(", "));
    }
    println!();
}

/// Accepted/rejected tally for one collection.
pub fn print_collection_tally(outcome: &CollectionOutcome) {
    println!(
        "TOOLS: {} :: ERRORS: {}",
        outcome.accepted_count(),
        outcome.rejected_count()
    );
}

/// Grand total across all collections of a run.
pub fn print_grand_total(summary: &RunSummary) {
    println!(
        "TOTAL TOOLS: {} :: TOTAL ERRORS: {}",
        summary.total_accepted(),
        summary.total_rejected()
    );
}
