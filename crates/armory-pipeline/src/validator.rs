//! # Record Validator
//!
//! The core of the pipeline: given one loaded raw mapping plus the
//! record's derived identity, run the fixed, ordered rule set and
//! accumulate every violation found. The record is accepted iff the
//! violation list is empty at the end — validation never stops at the
//! first failure.
//!
//! The closed-world key checks (required presence, unrecognized
//! rejection) operate on the raw untyped key set. Only after every
//! check has passed is the patched mapping deserialized into the typed
//! [`Record`]; a type mismatch surviving the key checks is itself
//! reported as a violation rather than escalated.
//!
//! One deliberate asymmetry: a missing or non-sequence `commands` value
//! short-circuits the command-shape check (and only that check), while
//! every other rule accumulates.

use std::collections::BTreeSet;

use serde_json::Value;

use armory_core::{Record, ShowField, Slug, Tag, TagRegistry};

use crate::loader::RawRecord;

/// The closed key sets of the record schema, as immutable values.
///
/// Passed into [`RecordValidator::new`] rather than living in statics,
/// so variant schemas can coexist and be tested in isolation.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    required: Vec<String>,
    optional: Vec<String>,
    autogenerated: Vec<String>,
    command_fields: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl FieldSchema {
    /// The tool record schema: `name`/`description`/`commands`/`tags`
    /// required; `references`/`links`/`show` optional; `slug`/`id`
    /// autogenerated; command entries limited to `command`/`description`.
    pub fn tool() -> Self {
        Self {
            required: strings(&["name", "description", "commands", "tags"]),
            optional: strings(&["references", "links", "show"]),
            autogenerated: strings(&["slug", "id"]),
            command_fields: strings(&["command", "description"]),
        }
    }

    /// Required top-level keys.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Optional top-level keys.
    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// True when the key belongs to required ∪ optional ∪ autogenerated.
    fn is_recognized(&self, key: &str) -> bool {
        self.required.iter().any(|f| f == key)
            || self.optional.iter().any(|f| f == key)
            || self.autogenerated.iter().any(|f| f == key)
    }

    fn is_command_field(&self, key: &str) -> bool {
        self.command_fields.iter().any(|f| f == key)
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::tool()
    }
}

/// The subsystem that raised a violation, so a log consumer can group
/// failures by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationScope {
    /// Slug legality, required/unrecognized keys, shape mismatches.
    FileStructure,
    /// A tag slug with no match in the active registry.
    TagResolution,
    /// An extraneous key inside a command entry.
    CommandShape,
    /// An illegal `show` value.
    ShowField,
}

impl ViolationScope {
    /// Short report label for this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileStructure => "FILE",
            Self::TagResolution => "TAGS",
            Self::CommandShape => "COMMANDS",
            Self::ShowField => "SHOW",
        }
    }
}

/// A single reported reason a record failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Which subsystem raised it.
    pub scope: ViolationScope,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Build a violation in the given scope.
    pub fn new(scope: ViolationScope, message: String) -> Self {
        Self { scope, message }
    }

    pub(crate) fn file(message: String) -> Self {
        Self::new(ViolationScope::FileStructure, message)
    }

    fn tags(message: String) -> Self {
        Self::new(ViolationScope::TagResolution, message)
    }

    fn commands(message: String) -> Self {
        Self::new(ViolationScope::CommandShape, message)
    }

    fn show(message: String) -> Self {
        Self::new(ViolationScope::ShowField, message)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} :: {}", self.scope.as_str(), self.message)
    }
}

/// Contextual identity of the record under validation: the slug derived
/// from the source file name and the index assigned in processing order.
#[derive(Debug, Clone)]
pub struct RecordIdentity {
    /// Derived slug.
    pub slug: Slug,
    /// Assigned positional id.
    pub id: u64,
}

impl RecordIdentity {
    /// Build an identity from a derived slug and assigned index.
    pub fn new(slug: Slug, id: u64) -> Self {
        Self { slug, id }
    }
}

/// Runs the rule set against raw record mappings.
///
/// Holds the field schema and a reference to the active tag registry
/// for the record's category.
#[derive(Debug)]
pub struct RecordValidator<'a> {
    schema: FieldSchema,
    registry: &'a TagRegistry,
}

impl<'a> RecordValidator<'a> {
    /// Build a validator from an explicit schema and registry.
    pub fn new(schema: FieldSchema, registry: &'a TagRegistry) -> Self {
        Self { schema, registry }
    }

    /// Validate one raw mapping, accumulating every violation.
    ///
    /// Returns the normalized record when no check failed, otherwise
    /// the non-empty violation list. Check order affects only the
    /// ordering of messages, never the outcome.
    pub fn validate(
        &self,
        mut raw: RawRecord,
        identity: &RecordIdentity,
    ) -> Result<Record, Vec<Violation>> {
        let mut violations = Vec::new();

        // Key set as supplied by the source, captured before the
        // autogenerated fields are injected.
        let supplied: Vec<String> = raw.keys().cloned().collect();

        // Slug legality: one message naming every illegal character.
        let illegal = identity.slug.illegal_chars();
        if !illegal.is_empty() {
            let listed = illegal
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            violations.push(Violation::file(format!(
                "slug {:?} is not valid, illegal characters: \"{listed}\"",
                identity.slug.as_str()
            )));
        }

        // Autogenerated fields are never taken from the source file.
        // A source-supplied `slug` or `id` is a recognized key (the
        // closed-world check below counts autogenerated keys) and is
        // overwritten here.
        raw.insert(
            "slug".to_string(),
            Value::String(identity.slug.as_str().to_string()),
        );
        raw.insert("id".to_string(), Value::from(identity.id));

        // Required presence: every missing field is listed.
        for field in &self.schema.required {
            if !supplied.iter().any(|k| k == field) {
                violations.push(Violation::file(format!("missing field: {field}")));
            }
        }

        // Closed-world check: every supplied key must be recognized.
        for key in &supplied {
            if !self.schema.is_recognized(key) {
                violations.push(Violation::file(format!("unrecognized field: {key}")));
            }
        }

        // Tag resolution.
        let resolved_tags = self.resolve_tags(raw.remove("tags"), &mut violations);
        match serde_json::to_value(&resolved_tags) {
            Ok(value) => {
                raw.insert("tags".to_string(), value);
            }
            Err(e) => violations.push(Violation::file(format!("tag serialization failed: {e}"))),
        }

        // Command shape. An absent `commands` was already reported by
        // the required-presence check and short-circuits only this
        // check; a non-sequence value likewise.
        match raw.get("commands") {
            None => {}
            Some(Value::Array(entries)) => {
                for entry in entries {
                    match entry {
                        Value::Object(map) => {
                            for key in map.keys() {
                                if !self.schema.is_command_field(key) {
                                    violations.push(Violation::commands(format!(
                                        "unrecognized command field: {key}"
                                    )));
                                }
                            }
                        }
                        other => violations.push(Violation::commands(format!(
                            "command entry must be a mapping, got: {other}"
                        ))),
                    }
                }
            }
            Some(other) => violations.push(Violation::commands(format!(
                "commands must be a sequence, got: {other}"
            ))),
        }

        // `show` legality: null means "not provided" and is removed.
        let prune_show = match raw.get("show") {
            None => false,
            Some(Value::Null) => true,
            Some(Value::String(s))
                if s == ShowField::Description.as_str() || s == ShowField::Command.as_str() =>
            {
                false
            }
            Some(other) => {
                violations.push(Violation::show(format!(
                    "invalid show value: {other}, expected \"description\" or \"command\""
                )));
                false
            }
        };
        if prune_show {
            raw.remove("show");
        }

        // Optional list pruning: a sequence that is empty or starts
        // with null is the sentinel for "declared but not provided".
        for field in &self.schema.optional {
            let prune = matches!(
                raw.get(field.as_str()),
                Some(Value::Array(items)) if items.first().map_or(true, Value::is_null)
            );
            if prune {
                raw.remove(field.as_str());
            }
        }

        if violations.is_empty() {
            // Every key check has passed; the typed parse can only
            // fail on a value-type mismatch (e.g. a numeric `name`),
            // which is reported instead of silently serialized.
            match serde_json::from_value::<Record>(Value::Object(raw)) {
                Ok(record) => return Ok(record),
                Err(e) => violations.push(Violation::file(format!(
                    "record does not match the expected shape: {e}"
                ))),
            }
        }

        Err(violations)
    }

    /// Deduplicate the supplied tag slugs and resolve each against the
    /// registry. Input order is dropped: the set iterates in
    /// lexicographic slug order, so output is deterministic for any
    /// input ordering. Unresolved slugs are reported and excluded;
    /// resolvable slugs in the same record still resolve.
    fn resolve_tags(
        &self,
        tags_value: Option<Value>,
        violations: &mut Vec<Violation>,
    ) -> Vec<Tag> {
        let mut resolved = Vec::new();
        match tags_value {
            // Absent `tags` was already reported by the required-
            // presence check; treat as an empty sequence here.
            None => {}
            Some(Value::Array(entries)) => {
                let mut slugs = BTreeSet::new();
                for entry in entries {
                    match entry {
                        Value::String(s) => {
                            slugs.insert(s);
                        }
                        other => violations
                            .push(Violation::tags(format!("invalid tag: {other}"))),
                    }
                }
                for slug in slugs {
                    match self.registry.resolve(&slug) {
                        Some(tag) => resolved.push(tag.clone()),
                        None => violations
                            .push(Violation::tags(format!("invalid tag: {slug}"))),
                    }
                }
            }
            Some(other) => violations.push(Violation::tags(format!(
                "tags must be a sequence of slugs, got: {other}"
            ))),
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::Category;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be a mapping, got: {other}"),
        }
    }

    fn identity(slug: &str, id: u64) -> RecordIdentity {
        RecordIdentity::new(Slug::new(slug), id)
    }

    fn valid_raw() -> RawRecord {
        raw(json!({
            "name": "Volatility",
            "description": "Memory forensics framework.",
            "commands": [
                {"command": "vol.py -f mem.raw pslist", "description": "List processes"}
            ],
            "tags": ["memory"]
        }))
    }

    fn validator(registry: &TagRegistry) -> RecordValidator<'_> {
        RecordValidator::new(FieldSchema::tool(), registry)
    }

    #[test]
    fn test_valid_record_accepted_with_exact_keys() {
        let registry = TagRegistry::builtin(Category::Blue);
        let record = validator(&registry)
            .validate(valid_raw(), &identity("volatility", 0))
            .unwrap();

        assert_eq!(record.id, 0);
        assert_eq!(record.slug.as_str(), "volatility");
        assert_eq!(record.tags, vec![Tag::new("Memory", "memory")]);

        // Exactly the permitted keys, nothing else (sorted key order).
        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["commands", "description", "id", "name", "slug", "tags"]
        );
    }

    #[test]
    fn test_each_missing_required_field_is_named() {
        let registry = TagRegistry::builtin(Category::Blue);
        for field in ["name", "description", "commands", "tags"] {
            let mut input = valid_raw();
            input.remove(field);
            let violations = validator(&registry)
                .validate(input, &identity("volatility", 0))
                .unwrap_err();
            assert!(
                violations
                    .iter()
                    .any(|v| v.scope == ViolationScope::FileStructure
                        && v.message.contains(field)),
                "expected a violation naming {field:?}, got: {violations:?}"
            );
        }
    }

    #[test]
    fn test_all_missing_fields_listed_not_just_first() {
        let registry = TagRegistry::builtin(Category::Blue);
        let violations = validator(&registry)
            .validate(raw(json!({})), &identity("empty", 0))
            .unwrap_err();
        let missing: Vec<&str> = violations
            .iter()
            .filter(|v| v.message.starts_with("missing field"))
            .map(|v| v.message.as_str())
            .collect();
        assert_eq!(missing.len(), 4, "got: {missing:?}");
    }

    #[test]
    fn test_unrecognized_field_rejected_independently() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("descriptoin".to_string(), json!("typo"));
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("descriptoin"));

        // Also reported when required fields are missing at the same time.
        let violations = validator(&registry)
            .validate(
                raw(json!({"bogus": true})),
                &identity("volatility", 0),
            )
            .unwrap_err();
        assert!(violations.iter().any(|v| v.message.contains("bogus")));
        assert!(violations.iter().any(|v| v.message.contains("missing field")));
    }

    #[test]
    fn test_source_supplied_autogenerated_fields_are_overwritten() {
        // `slug` and `id` are recognized keys, so supplying them is not
        // a violation; the injected values win.
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("slug".to_string(), json!("forged"));
        input.insert("id".to_string(), json!(999));
        let record = validator(&registry)
            .validate(input, &identity("volatility", 7))
            .unwrap();
        assert_eq!(record.slug.as_str(), "volatility");
        assert_eq!(record.id, 7);
    }

    #[test]
    fn test_tag_dedup_is_order_independent() {
        let registry = TagRegistry::builtin(Category::Blue);
        let v = validator(&registry);

        let mut a = valid_raw();
        a.insert("tags".to_string(), json!(["memory", "memory", "artifact"]));
        let mut b = valid_raw();
        b.insert("tags".to_string(), json!(["artifact", "memory"]));

        let ra = v.validate(a, &identity("volatility", 0)).unwrap();
        let rb = v.validate(b, &identity("volatility", 0)).unwrap();
        assert_eq!(ra.tags, rb.tags);
        assert_eq!(ra.tags.len(), 2);
    }

    #[test]
    fn test_unresolvable_tag_reported_others_still_resolve() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("tags".to_string(), json!(["memory", "quantum"]));
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].scope, ViolationScope::TagResolution);
        assert!(violations[0].message.contains("quantum"));
    }

    #[test]
    fn test_tag_from_wrong_category_does_not_resolve() {
        let red = TagRegistry::builtin(Category::Red);
        let mut input = valid_raw();
        // "memory" exists only in the blue registry.
        input.insert("tags".to_string(), json!(["memory"]));
        let violations = validator(&red)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert!(violations[0].message.contains("memory"));
    }

    #[test]
    fn test_absent_tags_not_reported_twice() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.remove("tags");
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        // One violation from the required-presence check, none from
        // tag resolution.
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].scope, ViolationScope::FileStructure);
    }

    #[test]
    fn test_non_sequence_tags_is_a_violation() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("tags".to_string(), json!("memory"));
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert_eq!(violations[0].scope, ViolationScope::TagResolution);
        assert!(violations[0].message.contains("sequence"));
    }

    #[test]
    fn test_command_entry_extra_key_cited() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert(
            "commands".to_string(),
            json!([{"command": "whoami", "description": "id", "extra": "x"}]),
        );
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].scope, ViolationScope::CommandShape);
        assert!(violations[0].message.contains("extra"));
    }

    #[test]
    fn test_command_entry_missing_text_is_not_checked() {
        // The asymmetry: only extraneous keys are checked, never
        // missing command or description text.
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("commands".to_string(), json!([{"command": "whoami"}, {}]));
        let record = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap();
        assert_eq!(record.commands.len(), 2);
        assert_eq!(record.commands[0].command.as_deref(), Some("whoami"));
        assert!(record.commands[1].command.is_none());
    }

    #[test]
    fn test_non_sequence_commands_is_a_violation() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("commands".to_string(), json!("whoami"));
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert!(violations
            .iter()
            .any(|v| v.scope == ViolationScope::CommandShape));
    }

    #[test]
    fn test_show_values() {
        let registry = TagRegistry::builtin(Category::Blue);
        let v = validator(&registry);

        let mut ok = valid_raw();
        ok.insert("show".to_string(), json!("command"));
        let record = v.validate(ok, &identity("volatility", 0)).unwrap();
        assert_eq!(record.show, Some(ShowField::Command));

        let mut null_show = valid_raw();
        null_show.insert("show".to_string(), json!(null));
        let record = v.validate(null_show, &identity("volatility", 0)).unwrap();
        assert!(record.show.is_none());

        let mut bad = valid_raw();
        bad.insert("show".to_string(), json!("both"));
        let violations = v.validate(bad, &identity("volatility", 0)).unwrap_err();
        assert_eq!(violations[0].scope, ViolationScope::ShowField);
        assert!(violations[0].message.contains("both"));
    }

    #[test]
    fn test_sentinel_empty_optionals_pruned() {
        let registry = TagRegistry::builtin(Category::Blue);
        let v = validator(&registry);

        let mut input = valid_raw();
        input.insert("references".to_string(), json!([null]));
        input.insert("links".to_string(), json!([]));
        let record = v.validate(input, &identity("volatility", 0)).unwrap();
        assert!(record.references.is_none());
        assert!(record.links.is_none());

        let mut input = valid_raw();
        input.insert("references".to_string(), json!(["http://x"]));
        let record = v.validate(input, &identity("volatility", 0)).unwrap();
        assert_eq!(record.references, Some(vec!["http://x".to_string()]));
    }

    #[test]
    fn test_illegal_slug_chars_listed_in_one_message() {
        let registry = TagRegistry::builtin(Category::Blue);
        let violations = validator(&registry)
            .validate(valid_raw(), &identity("my tool_v2", 0))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains(' '));
        assert!(violations[0].message.contains('_'));
    }

    #[test]
    fn test_type_mismatch_reported_not_panicked() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("name".to_string(), json!(42));
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].scope, ViolationScope::FileStructure);
        assert!(violations[0].message.contains("expected shape"));
    }

    #[test]
    fn test_violations_accumulate_across_checks() {
        let registry = TagRegistry::builtin(Category::Blue);
        let input = raw(json!({
            "description": "No name.",
            "commands": [{"cmd": "typo-key"}],
            "tags": ["nonexistent"],
            "show": "everything"
        }));
        let violations = validator(&registry)
            .validate(input, &identity("bad_slug!", 0))
            .unwrap_err();

        let scopes: std::collections::HashSet<ViolationScope> =
            violations.iter().map(|v| v.scope).collect();
        assert!(scopes.contains(&ViolationScope::FileStructure)); // slug + missing name
        assert!(scopes.contains(&ViolationScope::TagResolution));
        assert!(scopes.contains(&ViolationScope::CommandShape));
        assert!(scopes.contains(&ViolationScope::ShowField));
        assert!(violations.len() >= 5, "got: {violations:?}");
    }

    #[test]
    fn test_violation_display_carries_scope_label() {
        let registry = TagRegistry::builtin(Category::Blue);
        let mut input = valid_raw();
        input.insert("tags".to_string(), json!(["quantum"]));
        let violations = validator(&registry)
            .validate(input, &identity("volatility", 0))
            .unwrap_err();
        assert_eq!(violations[0].to_string(), "TAGS :: invalid tag: quantum");
    }
}
