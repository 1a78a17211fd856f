//! # Tags and Tag Registries
//!
//! A tag is a named category label (`{name, slug}`) used to classify
//! records. Tags are drawn from a closed registry: record files refer
//! to tags by slug, and the validator resolves each slug against the
//! registry of the record's category, replacing it with the full tag
//! object in the output.
//!
//! Registries are plain values. Each category carries its own built-in
//! registry, and a build configuration may substitute its own list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::category::Category;
use crate::error::CoreError;

/// A named category label with its own URL-safe slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Human-readable label shown by the front-end.
    pub name: String,
    /// URL-safe identifier; unique within a registry.
    pub slug: String,
}

impl Tag {
    /// Construct a tag from a name and slug.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// The closed, authoritative list of valid tags for one category.
///
/// Slugs are unique within a registry; [`TagRegistry::new`] rejects
/// duplicates at construction so lookups are never ambiguous.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    /// Build a registry from a tag list, rejecting duplicate slugs.
    pub fn new(tags: Vec<Tag>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for tag in &tags {
            if !seen.insert(tag.slug.as_str()) {
                return Err(CoreError::DuplicateTagSlug(tag.slug.clone()));
            }
        }
        Ok(Self { tags })
    }

    /// The built-in registry for a category.
    pub fn builtin(category: Category) -> Self {
        let pairs: &[(&str, &str)] = match category {
            Category::Red => &[
                ("Reconnaissance", "reconnaissance"),
                ("Execution", "execution"),
                ("Persistence", "persistence"),
                ("Privilege Escalation", "privilege-escalation"),
                ("Defense Evasion", "defense-evasion"),
                ("Credential Access", "credential-access"),
                ("Lateral Movement", "lateral-movement"),
                ("Collection", "collection"),
                ("Command and Control", "command-and-control"),
                ("Exfiltration", "exfiltration"),
            ],
            Category::Blue => &[
                // what are you looking for?
                ("Execution", "execution"),
                ("Artifact", "artifact"),
                ("Download", "download"),
                ("Authentication", "authentication"),
                ("Command", "command"),
                ("Account", "account"),
                ("Persistence", "persistence"),
                // what do you have?
                ("Memory", "memory"),
                ("Event Log", "event-log"),
                ("Registry", "registry"),
                ("Network Capture", "network-capture"),
                ("MS Office", "office"),
                ("Disk Image", "disk-image"),
            ],
        };
        Self {
            tags: pairs
                .iter()
                .map(|(name, slug)| Tag::new(*name, *slug))
                .collect(),
        }
    }

    /// Look up a tag by exact slug match.
    pub fn resolve(&self, slug: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.slug == slug)
    }

    /// True when the registry contains the slug.
    pub fn contains(&self, slug: &str) -> bool {
        self.resolve(slug).is_some()
    }

    /// Number of tags in the registry.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True when the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate the tags in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }
}
