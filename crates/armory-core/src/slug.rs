//! # Slugs
//!
//! A slug is the URL-safe identifier of a record, derived from its
//! source file name: the `.yaml`/`.yml` extension is stripped
//! case-insensitively and the stem is lower-cased. Legal slugs contain
//! only ASCII letters, digits, and hyphens; anything else is reported
//! by the validator, character by character.

use serde::{Deserialize, Serialize};

/// URL-safe identifier derived from a record's source file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Wrap an already-derived slug string.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Derive a slug from a source file name.
    ///
    /// Strips a trailing `.yaml` or `.yml` extension regardless of case
    /// and lower-cases the stem. `My-Tool.YAML` becomes `my-tool`.
    /// An inner dot (e.g. `archive.tar.yaml`) survives into the slug
    /// and is reported as an illegal character.
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = match file_name.rsplit_once('.') {
            Some((stem, ext))
                if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") =>
            {
                stem
            }
            _ => file_name,
        };
        Self(stem.to_ascii_lowercase())
    }

    /// Access the slug string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every character of this slug outside the allowed class
    /// {A–Z, a–z, 0–9, `-`}, in order of appearance.
    pub fn illegal_chars(&self) -> Vec<char> {
        self.0
            .chars()
            .filter(|c| !c.is_ascii_alphanumeric() && *c != '-')
            .collect()
    }

    /// True when the slug contains no illegal characters.
    pub fn is_valid(&self) -> bool {
        self.0
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name_mixed_case_extension() {
        assert_eq!(Slug::from_file_name("My-Tool.YAML").as_str(), "my-tool");
        assert_eq!(Slug::from_file_name("volatility.yaml").as_str(), "volatility");
        assert_eq!(Slug::from_file_name("Chainsaw.Yml").as_str(), "chainsaw");
    }

    #[test]
    fn test_from_file_name_without_extension() {
        assert_eq!(Slug::from_file_name("plaso").as_str(), "plaso");
    }

    #[test]
    fn test_inner_dot_survives() {
        let slug = Slug::from_file_name("archive.tar.yaml");
        assert_eq!(slug.as_str(), "archive.tar");
        assert_eq!(slug.illegal_chars(), vec!['.']);
    }

    #[test]
    fn test_illegal_chars_reported_individually() {
        let slug = Slug::from_file_name("my tool_v2.yaml");
        assert_eq!(slug.illegal_chars(), vec![' ', '_']);
        assert!(!slug.is_valid());
    }

    #[test]
    fn test_valid_slug_has_no_illegal_chars() {
        let slug = Slug::from_file_name("bloodhound-4.yaml");
        assert!(slug.illegal_chars().is_empty());
        assert!(slug.is_valid());
    }

    #[test]
    fn test_serde_transparent() {
        let slug = Slug::new("mimikatz");
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"mimikatz\"");
        let back: Slug = serde_json::from_str("\"mimikatz\"").unwrap();
        assert_eq!(back, slug);
    }
}
