//! Document and item shape validation.
//!
//! Turns the decoded YAML tree into a closed item enum. Every shape
//! violation here is fatal; tolerance for authoring slips (markers,
//! versions) lives in the model builder.

use serde_yaml::Value;

use crate::error::{NluError, Result};

/// Reserved top-level key holding the schema version scalar.
pub const KEY_VERSION: &str = "version";
/// Reserved top-level key holding the list of training items.
pub const KEY_NLU: &str = "nlu";

const KEY_EXAMPLES: &str = "examples";
const KEY_METADATA: &str = "metadata";
const KEY_TEXT: &str = "text";

/// All top-level keys of the shared document format. Sections other than
/// `nlu` belong to sibling tooling and are ignored by this reader.
const DOCUMENT_KEYS: [&str; 5] = [KEY_VERSION, KEY_NLU, "stories", "rules", "responses"];

const DISCRIMINATOR_KEYS: [&str; 4] = ["intent", "synonym", "lookup", "regex"];

/// A validated document: version scalar (if any) plus its nlu items.
#[derive(Debug)]
pub struct NluDocument {
    pub version: Option<Value>,
    pub items: Vec<NluItem>,
}

/// The two accepted shapes of an item's `examples` value.
#[derive(Debug)]
pub enum ExamplesSource {
    /// No `examples` key, or an explicit null.
    Missing,
    /// One multi-line string using the leading-marker convention.
    Block(String),
    /// A list of `{text, metadata}` entries (intent items only).
    List(Vec<ListedExample>),
}

/// One entry of the list-shaped `examples` value.
#[derive(Debug)]
pub struct ListedExample {
    pub text: String,
    pub metadata: Option<Value>,
}

/// One validated nlu item. The discriminator rule (exactly one of
/// intent/synonym/lookup/regex) is enforced by construction.
#[derive(Debug)]
pub enum NluItem {
    Intent {
        name: String,
        examples: ExamplesSource,
        metadata: Option<Value>,
    },
    Synonym {
        name: String,
        examples: ExamplesSource,
    },
    Lookup {
        name: String,
        examples: ExamplesSource,
    },
    Regex {
        name: String,
        examples: ExamplesSource,
    },
}

impl NluItem {
    /// The item's discriminator keyword, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NluItem::Intent { .. } => "intent",
            NluItem::Synonym { .. } => "synonym",
            NluItem::Lookup { .. } => "lookup",
            NluItem::Regex { .. } => "regex",
        }
    }

    /// The item's name.
    pub fn name(&self) -> &str {
        match self {
            NluItem::Intent { name, .. }
            | NluItem::Synonym { name, .. }
            | NluItem::Lookup { name, .. }
            | NluItem::Regex { name, .. } => name,
        }
    }
}

/// Validate a decoded document tree.
pub fn validate_document(root: Value) -> Result<NluDocument> {
    let map = match root {
        Value::Mapping(map) => map,
        _ => {
            return Err(NluError::schema_with_help(
                "document root must be a mapping",
                "Expected top-level keys like 'version' and 'nlu'",
            ));
        }
    };

    let mut version = None;
    let mut nlu = None;

    for (key, value) in &map {
        let name = key.as_str().ok_or_else(|| {
            NluError::schema(format!("top-level key {key:?} is not a string"))
        })?;
        if !DOCUMENT_KEYS.contains(&name) {
            return Err(NluError::schema_with_help(
                format!("unexpected top-level key '{name}'"),
                format!("Recognized keys are: {}", DOCUMENT_KEYS.join(", ")),
            ));
        }
        match name {
            KEY_VERSION => version = Some(value.clone()),
            KEY_NLU => nlu = Some(value),
            _ => {} // sibling section, ignored
        }
    }

    let version = match version {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    };

    let items = match nlu {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(entries)) => entries
            .iter()
            .map(validate_item)
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(NluError::schema_with_help(
                "'nlu' must be a list of items",
                "Each item starts with one of: intent, synonym, lookup, regex",
            ));
        }
    };

    Ok(NluDocument { version, items })
}

/// Validate one entry of the `nlu` list.
fn validate_item(value: &Value) -> Result<NluItem> {
    let map = value.as_mapping().ok_or_else(|| {
        NluError::schema_with_help(
            "each nlu item must be a mapping",
            "Start the item with 'intent:', 'synonym:', 'lookup:' or 'regex:'",
        )
    })?;

    let mut fields: Vec<(&str, &Value)> = Vec::with_capacity(map.len());
    for (key, field) in map {
        let name = key.as_str().ok_or_else(|| {
            NluError::schema(format!("item key {key:?} is not a string"))
        })?;
        fields.push((name, field));
    }

    let mut discriminators = fields
        .iter()
        .copied()
        .filter(|(name, _)| DISCRIMINATOR_KEYS.contains(name));
    let discriminator = match (discriminators.next(), discriminators.next()) {
        (Some(first), None) => first,
        (None, _) => {
            return Err(NluError::schema_with_help(
                "nlu item matches none of the recognized shapes",
                "Each item needs exactly one of: intent, synonym, lookup, regex",
            ));
        }
        (Some(first), Some(second)) => {
            return Err(NluError::schema(format!(
                "nlu item is ambiguous: both '{}' and '{}' are present",
                first.0, second.0
            )));
        }
    };

    let (kind, name_value) = discriminator;
    let name = name_value
        .as_str()
        .ok_or_else(|| NluError::schema(format!("'{kind}' name must be a string")))?
        .to_string();

    for (key, _) in &fields {
        if *key != kind && *key != KEY_EXAMPLES && *key != KEY_METADATA {
            return Err(NluError::schema_with_help(
                format!("unexpected key '{key}' in {kind} item '{name}'"),
                format!("A {kind} item allows only: {kind}, examples, metadata"),
            ));
        }
    }

    let examples = validate_examples(map.get(KEY_EXAMPLES), kind, &name)?;
    let metadata = normalize_metadata(map.get(KEY_METADATA));

    Ok(match kind {
        "intent" => NluItem::Intent {
            name,
            examples,
            metadata,
        },
        "synonym" => NluItem::Synonym { name, examples },
        "lookup" => NluItem::Lookup { name, examples },
        _ => NluItem::Regex { name, examples },
    })
}

/// Validate the `examples` value of an item.
fn validate_examples(value: Option<&Value>, kind: &str, name: &str) -> Result<ExamplesSource> {
    match value {
        None | Some(Value::Null) => Ok(ExamplesSource::Missing),
        Some(Value::String(block)) => Ok(ExamplesSource::Block(block.clone())),
        Some(Value::Sequence(entries)) => {
            let entries = entries
                .iter()
                .map(|entry| validate_listed_example(entry, kind, name))
                .collect::<Result<Vec<_>>>()?;
            Ok(ExamplesSource::List(entries))
        }
        Some(_) => Err(NluError::schema_with_help(
            format!("examples of {kind} '{name}' must be a multi-line string or a list"),
            "Use 'examples: |' with '- ' lines, or a list of {text, metadata} entries".to_string(),
        )),
    }
}

/// Validate one entry of a list-shaped `examples` value.
fn validate_listed_example(entry: &Value, kind: &str, name: &str) -> Result<ListedExample> {
    let map = entry.as_mapping().ok_or_else(|| {
        NluError::schema(format!(
            "each examples entry of {kind} '{name}' must be a mapping with a 'text' key"
        ))
    })?;

    let mut text = None;
    for (key, field) in map {
        match key.as_str() {
            Some(KEY_TEXT) => match field {
                Value::String(value) => text = Some(value.clone()),
                _ => {
                    return Err(NluError::schema(format!(
                        "'text' of an examples entry of {kind} '{name}' must be a string"
                    )));
                }
            },
            Some(KEY_METADATA) => {}
            _ => {
                return Err(NluError::schema(format!(
                    "unexpected key {key:?} in an examples entry of {kind} '{name}'"
                )));
            }
        }
    }

    let text = text.ok_or_else(|| {
        NluError::schema(format!(
            "examples entry of {kind} '{name}' is missing its 'text' key"
        ))
    })?;

    Ok(ListedExample {
        text,
        metadata: normalize_metadata(map.get(KEY_METADATA)),
    })
}

/// An explicit null metadata value counts as absent.
fn normalize_metadata(value: Option<&Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(source: &str) -> Result<NluDocument> {
        validate_document(serde_yaml::from_str(source).unwrap())
    }

    #[test]
    fn test_minimal_document_with_sibling_sections() {
        let doc = document("version: '2.0'\nnlu:\nstories:").unwrap();

        assert!(doc.items.is_empty());
        assert!(doc.version.is_some());
    }

    #[test]
    fn test_unexpected_top_level_key() {
        let result = document("nlu:\nbogus: 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_root_must_be_mapping() {
        let result = document("- just\n- a\n- list");
        assert!(result.is_err());
    }

    #[test]
    fn test_nlu_must_be_list() {
        let result = document("nlu: not-a-list");
        assert!(result.is_err());
    }

    #[test]
    fn test_intent_item() {
        let doc = document("nlu:\n- intent: greet\n  examples: |\n    - hi\n").unwrap();

        assert_eq!(doc.items.len(), 1);
        let item = &doc.items[0];
        assert_eq!(item.kind(), "intent");
        assert_eq!(item.name(), "greet");
        match item {
            NluItem::Intent { examples: ExamplesSource::Block(block), .. } => {
                assert_eq!(block, "- hi\n");
            }
            other => panic!("expected block examples, got {other:?}"),
        }
    }

    #[test]
    fn test_item_with_no_discriminator() {
        let result = document("nlu:\n- examples: |\n    - hi\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_item_with_two_discriminators() {
        let result = document("nlu:\n- intent: a\n  synonym: b\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_item_with_unexpected_key() {
        let result = document("nlu:\n- intent: name\n  non_key: value\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_item_must_be_mapping() {
        let result = document("nlu:\n- just a string\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_listed_examples() {
        let source = "nlu:\n- intent: greet\n  examples:\n  - text: |\n      hi there\n    metadata:\n      sentiment: positive\n  - text: |\n      hello\n";
        let doc = document(source).unwrap();

        match &doc.items[0] {
            NluItem::Intent { examples: ExamplesSource::List(entries), .. } => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].text, "hi there\n");
                assert!(entries[0].metadata.is_some());
                assert!(entries[1].metadata.is_none());
            }
            other => panic!("expected listed examples, got {other:?}"),
        }
    }

    #[test]
    fn test_listed_example_requires_text() {
        let result = document("nlu:\n- intent: greet\n  examples:\n  - metadata: x\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_examples_wrong_shape() {
        let result = document("nlu:\n- intent: greet\n  examples: 42\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_null_metadata_is_absent() {
        let doc = document("nlu:\n- intent: greet\n  metadata:\n  examples: |\n    - hi\n").unwrap();

        match &doc.items[0] {
            NluItem::Intent { metadata, .. } => assert!(metadata.is_none()),
            other => panic!("expected intent, got {other:?}"),
        }
    }
}
