//! # The Tool Record
//!
//! The unit of output: one validated entry describing a tool or
//! technique. Records are constructed by the pipeline from one source
//! file each and serialized wholesale into the category's catalog.
//!
//! Optional attributes are omitted from the serialized form entirely
//! when absent; the front-end never sees a `null` or a placeholder
//! empty list.

use serde::{Deserialize, Serialize};

use crate::slug::Slug;
use crate::tag::Tag;

/// One invocation example inside a record.
///
/// Both fields are optional on purpose: validation rejects extraneous
/// keys in a command entry but does not require either text to be
/// present, and the record model mirrors that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// The command line itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// What the command does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Which sub-field a consumer should render by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowField {
    /// Render the record description.
    Description,
    /// Render the command list.
    Command,
}

impl ShowField {
    /// Returns the lowercase string identifier for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Command => "command",
        }
    }
}

impl std::fmt::Display for ShowField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated catalog entry.
///
/// `id` and `slug` are autogenerated by the pipeline (enumeration order
/// and source file name respectively); a source file cannot supply
/// them. `tags` always holds fully-resolved [`Tag`] objects, never raw
/// slugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Positional identifier, unique within one generation run.
    pub id: u64,
    /// Identifier derived from the source file name.
    pub slug: Slug,
    /// Display name of the tool or technique.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// Invocation examples, in display order.
    pub commands: Vec<CommandEntry>,
    /// Resolved category labels.
    pub tags: Vec<Tag>,
    /// Reference URLs, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,
    /// Slugs of related records. Not checked for existence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    /// Default rendering hint for the front-end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<ShowField>,
}
