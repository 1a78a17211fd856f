//! # armory-core — Foundational Types
//!
//! Shared types for the Armory catalog generator: the red/blue category
//! routing key, tag registries, file-derived slugs, and the tool record
//! model that the pipeline validates and the site consumes.
//!
//! ## Crate Policy
//!
//! - No I/O. Everything here is a plain value; reading record files and
//!   writing catalogs is the pipeline crate's job.
//! - Registries and field rules are immutable values constructed
//!   explicitly, never process-wide statics, so per-category registries
//!   can coexist and be tested in isolation.

pub mod category;
pub mod error;
pub mod record;
pub mod slug;
pub mod tag;

pub use category::Category;
pub use error::CoreError;
pub use record::{CommandEntry, Record, ShowField};
pub use slug::Slug;
pub use tag::{Tag, TagRegistry};
