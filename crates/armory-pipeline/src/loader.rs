//! # Record Loader
//!
//! Opens one source file and deserializes it into a generic attribute
//! mapping. YAML parsing is a black box (`serde_yaml`); the loader's
//! job is to capture every failure mode as a [`LoadError`] carrying the
//! path and the parser's diagnostic, so the caller can record it as a
//! single violation for that file and keep the run going.
//!
//! The parsed YAML tree is converted to `serde_json` values before
//! validation: the validator and the output catalog both speak JSON,
//! and record files use only the JSON-compatible subset of YAML.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// The raw top-level mapping of one source file, before validation.
pub type RawRecord = serde_json::Map<String, Value>;

/// A source file could not be loaded into a raw mapping.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the record file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not syntactically valid YAML.
    #[error("invalid YAML in {path}: {message}")]
    Yaml {
        /// Path of the record file.
        path: PathBuf,
        /// The parser's diagnostic.
        message: String,
    },

    /// The document parsed, but its top level is not a mapping.
    #[error("{path}: top-level document must be a mapping")]
    NotAMapping {
        /// Path of the record file.
        path: PathBuf,
    },

    /// The document uses YAML constructs with no JSON equivalent.
    #[error("{path}: {message}")]
    Conversion {
        /// Path of the record file.
        path: PathBuf,
        /// What could not be converted.
        message: String,
    },
}

/// Load one record file into a raw attribute mapping.
pub fn load_record(path: &Path) -> Result<RawRecord, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| LoadError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let json = yaml_to_json(&yaml).map_err(|message| LoadError::Conversion {
        path: path.to_path_buf(),
        message,
    })?;

    match json {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Convert a `serde_yaml::Value` tree into the equivalent
/// `serde_json::Value` tree.
///
/// Record files use only the JSON-compatible subset of YAML, so
/// non-string mapping keys, non-finite floats, and YAML tags are
/// conversion errors rather than something to paper over.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => {
                        return Err(format!("unsupported non-string map key: {other:?}"))
                    }
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => {
            Err(format!("unsupported YAML tag: {:?}", tagged.tag))
        }
    }
}
