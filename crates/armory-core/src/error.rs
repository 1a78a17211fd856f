//! # Error Types
//!
//! Errors raised by the core types. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors from constructing or parsing core values.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Two tags in one registry share a slug. Lookups are by slug, so
    /// a duplicate would make resolution ambiguous.
    #[error("duplicate tag slug in registry: {0:?}")]
    DuplicateTagSlug(String),

    /// A category string did not match any known category.
    #[error("unknown category: {0:?} (expected \"red\" or \"blue\")")]
    UnknownCategory(String),
}
