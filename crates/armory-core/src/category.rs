//! # Catalog Categories
//!
//! The `Category` enum is the routing key of the pipeline: it selects
//! which tag registry applies to a record, which source directory the
//! record came from, and which catalog file it is written to. It is
//! never stored in an output record.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// The two collections the site publishes side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Offensive tooling and techniques.
    Red,
    /// Defensive and forensic tooling.
    Blue,
}

impl Category {
    /// Returns both categories in canonical order.
    pub fn all() -> &'static [Category] {
        &[Self::Red, Self::Blue]
    }

    /// Returns the lowercase string identifier for this category.
    ///
    /// Must match the serde serialization format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}
