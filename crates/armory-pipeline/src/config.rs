//! # Build Configuration
//!
//! Which collections to build, from where, to where, and against which
//! tag registry — an explicit value handed to the builder, loadable
//! from a YAML file. The single-collection and dual-category site
//! variants are just different configs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use armory_core::{Category, CoreError, Tag, TagRegistry};

use crate::catalog::CollectionPlan;

/// The configuration could not be loaded or materialized.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML or has the wrong shape.
    #[error("invalid config {path}: {message}")]
    Yaml {
        /// Path of the config file.
        path: PathBuf,
        /// The parser's diagnostic.
        message: String,
    },

    /// An inline tag list was not a valid registry.
    #[error(transparent)]
    Registry(#[from] CoreError),
}

/// One collection entry of a build config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Category of the collection; selects the built-in registry when
    /// no inline `tags` list is given.
    pub category: Category,
    /// Directory of per-record YAML files.
    pub source_dir: PathBuf,
    /// Destination of the serialized catalog.
    pub output_path: PathBuf,
    /// Optional inline registry overriding the category's built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

/// A full build configuration: the list of collections to process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Collections, processed in order.
    pub collections: Vec<CollectionConfig>,
}

impl BuildConfig {
    /// Load a configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// A one-collection configuration (the single-directory variant).
    pub fn single(
        category: Category,
        source_dir: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            collections: vec![CollectionConfig {
                category,
                source_dir: source_dir.into(),
                output_path: output_path.into(),
                tags: None,
            }],
        }
    }

    /// Materialize the collection plans, building each registry from
    /// the inline tag list when given, else the category's built-in.
    pub fn into_plans(self) -> Result<Vec<CollectionPlan>, ConfigError> {
        self.collections
            .into_iter()
            .map(|c| {
                let registry = match c.tags {
                    Some(tags) => TagRegistry::new(tags)?,
                    None => TagRegistry::builtin(c.category),
                };
                Ok(CollectionPlan {
                    category: c.category,
                    source_dir: c.source_dir,
                    output_path: c.output_path,
                    registry,
                })
            })
            .collect()
    }
}

impl Default for BuildConfig {
    /// The dual red/blue site layout.
    fn default() -> Self {
        Self {
            collections: vec![
                CollectionConfig {
                    category: Category::Red,
                    source_dir: PathBuf::from("data/red"),
                    output_path: PathBuf::from("red.json"),
                    tags: None,
                },
                CollectionConfig {
                    category: Category::Blue,
                    source_dir: PathBuf::from("data/blue"),
                    output_path: PathBuf::from("blue.json"),
                    tags: None,
                },
            ],
        }
    }
}
