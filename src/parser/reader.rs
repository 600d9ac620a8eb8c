//! Reader entry points and model building.
//!
//! `reads` walks the validated items of one document, feeding example
//! blocks through the block splitter and the annotation grammar and
//! accumulating the aggregate corpus. One invocation owns its corpus and
//! its diagnostics; nothing is shared between calls.

use serde_yaml::Value;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::Result;
use crate::types::{Example, LookupTable, RegexFeature, TrainingCorpus};

use super::annotation::parse_annotated_line;
use super::block::ExampleLines;
use super::schema::{self, ExamplesSource, NluItem};

/// Latest training-data format version this reader understands.
///
/// Documents without a version declaration, or with an unrecognized one,
/// are parsed under this version after a warning.
pub const LATEST_TRAINING_DATA_FORMAT_VERSION: &str = "2.0";

/// Parse a document into a training corpus plus collected warnings.
///
/// Fatal conditions (YAML syntax errors, shape violations, malformed
/// structured annotations) abort the whole parse; warnings never do.
pub fn reads(source: &str) -> Result<(TrainingCorpus, Diagnostics)> {
    let mut diagnostics = Diagnostics::new();

    let root: Value = serde_yaml::from_str(source)?;
    let document = schema::validate_document(root)?;

    check_version(document.version.as_ref(), &mut diagnostics);

    let mut corpus = TrainingCorpus::new();
    for item in document.items {
        match item {
            NluItem::Intent {
                name,
                examples,
                metadata,
            } => build_intent(&mut corpus, &mut diagnostics, &name, examples, metadata)?,
            NluItem::Synonym { name, examples } => {
                build_synonym(&mut corpus, &mut diagnostics, &name, examples);
            }
            NluItem::Lookup { name, examples } => {
                build_lookup(&mut corpus, &mut diagnostics, &name, examples);
            }
            NluItem::Regex { name, examples } => {
                build_regex(&mut corpus, &mut diagnostics, &name, examples);
            }
        }
    }

    Ok((corpus, diagnostics))
}

/// Check whether a document belongs to this dialect by inspecting its
/// top-level keys, without schema validation. Undecodable input is simply
/// not an nlu document.
pub fn is_nlu_document(source: &str) -> bool {
    match serde_yaml::from_str::<Value>(source) {
        Ok(Value::Mapping(map)) => map.contains_key(schema::KEY_NLU),
        _ => false,
    }
}

fn check_version(version: Option<&Value>, diagnostics: &mut Diagnostics) {
    match version {
        None => diagnostics.push(
            Warning::new(
                "nlu::read::missing-version",
                format!(
                    "document has no '{}' key; parsing it as version \"{}\"",
                    schema::KEY_VERSION,
                    LATEST_TRAINING_DATA_FORMAT_VERSION
                ),
            )
            .with_help(format!(
                "Add 'version: \"{LATEST_TRAINING_DATA_FORMAT_VERSION}\"' at the top of the document"
            )),
        ),
        Some(Value::String(version)) => {
            if version != LATEST_TRAINING_DATA_FORMAT_VERSION {
                diagnostics.warn(
                    "nlu::read::unsupported-version",
                    format!(
                        "version \"{version}\" is not the latest supported format version; \
                         parsing the document as version \"{LATEST_TRAINING_DATA_FORMAT_VERSION}\""
                    ),
                );
            }
        }
        Some(other) => diagnostics.push(
            Warning::new(
                "nlu::read::unsupported-version",
                format!(
                    "'{}' must be a quoted string, found {other:?}; parsing the document \
                     as version \"{LATEST_TRAINING_DATA_FORMAT_VERSION}\"",
                    schema::KEY_VERSION
                ),
            )
            .with_help("Quote the version number, e.g. version: \"2.0\""),
        ),
    }
}

/// Drain a block into its example lines, emitting at most one
/// missing-marker warning for the whole block.
fn drain_block<'a>(
    block: &'a str,
    kind: &str,
    name: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<&'a str> {
    let mut lines = ExampleLines::new(block);
    let collected: Vec<_> = (&mut lines).collect();
    if lines.saw_unmarked() {
        diagnostics.push(
            Warning::new(
                "nlu::read::missing-example-marker",
                format!(
                    "example block of {kind} '{name}' contains a line without the leading \
                     '- ' marker; such lines were dropped"
                ),
            )
            .with_help("Prefix each example line with '- '"),
        );
    }
    collected
}

fn warn_no_examples(diagnostics: &mut Diagnostics, kind: &str, name: &str) {
    diagnostics.warn(
        "nlu::read::no-examples",
        format!("{kind} '{name}' has no examples"),
    );
}

fn build_intent(
    corpus: &mut TrainingCorpus,
    diagnostics: &mut Diagnostics,
    name: &str,
    examples: ExamplesSource,
    item_metadata: Option<Value>,
) -> Result<()> {
    let mut count = 0usize;

    match examples {
        ExamplesSource::Block(block) => {
            for raw in drain_block(&block, "intent", name, diagnostics) {
                append_example(corpus, raw, name, item_metadata.clone())?;
                count += 1;
            }
        }
        ExamplesSource::List(entries) => {
            for entry in entries {
                // Listed texts bypass the block splitter; the literal
                // block scalar keeps a trailing newline we drop here.
                let metadata = entry.metadata.or_else(|| item_metadata.clone());
                append_example(corpus, entry.text.trim_end(), name, metadata)?;
                count += 1;
            }
        }
        ExamplesSource::Missing => {}
    }

    if count == 0 {
        warn_no_examples(diagnostics, "intent", name);
    }
    Ok(())
}

/// Parse one raw example line, fold its synonym registrations into the
/// corpus and append the resulting example.
fn append_example(
    corpus: &mut TrainingCorpus,
    raw: &str,
    intent: &str,
    metadata: Option<Value>,
) -> Result<()> {
    let line = parse_annotated_line(raw)?;
    let example = Example {
        text: line.text,
        intent: Some(intent.to_string()),
        entities: line.entities,
        metadata,
    };

    let pairs: Vec<(String, String)> = example
        .synonym_pairs()
        .map(|(surface, value)| (surface.to_string(), value.to_string()))
        .collect();
    for (surface, value) in pairs {
        corpus.synonyms.register(surface, value);
    }

    corpus.examples.push(example);
    Ok(())
}

fn build_synonym(
    corpus: &mut TrainingCorpus,
    diagnostics: &mut Diagnostics,
    name: &str,
    examples: ExamplesSource,
) {
    let block = match examples {
        ExamplesSource::Block(block) => block,
        ExamplesSource::List(_) => {
            diagnostics.warn(
                "nlu::read::unexpected-examples-shape",
                format!(
                    "examples of synonym '{name}' must be a multi-line string block; \
                     the item was skipped"
                ),
            );
            return;
        }
        ExamplesSource::Missing => {
            warn_no_examples(diagnostics, "synonym", name);
            return;
        }
    };

    let lines = drain_block(&block, "synonym", name, diagnostics);
    if lines.is_empty() {
        warn_no_examples(diagnostics, "synonym", name);
        return;
    }
    for line in lines {
        corpus.synonyms.register(line, name);
    }
}

fn build_lookup(
    corpus: &mut TrainingCorpus,
    diagnostics: &mut Diagnostics,
    name: &str,
    examples: ExamplesSource,
) {
    let block = match examples {
        ExamplesSource::Block(block) => block,
        ExamplesSource::List(_) => {
            diagnostics.warn(
                "nlu::read::unexpected-examples-shape",
                format!(
                    "examples of lookup '{name}' must be a multi-line string block; \
                     the item was skipped"
                ),
            );
            return;
        }
        ExamplesSource::Missing => {
            warn_no_examples(diagnostics, "lookup", name);
            return;
        }
    };

    let elements: Vec<String> = drain_block(&block, "lookup", name, diagnostics)
        .into_iter()
        .map(str::to_string)
        .collect();
    if elements.is_empty() {
        warn_no_examples(diagnostics, "lookup", name);
        return;
    }
    corpus.lookup_tables.push(LookupTable {
        name: name.to_string(),
        elements,
    });
}

fn build_regex(
    corpus: &mut TrainingCorpus,
    diagnostics: &mut Diagnostics,
    name: &str,
    examples: ExamplesSource,
) {
    let block = match examples {
        ExamplesSource::Block(block) => block,
        ExamplesSource::List(_) => {
            diagnostics.warn(
                "nlu::read::unexpected-examples-shape",
                format!(
                    "examples of regex '{name}' must be a multi-line string block; \
                     the item was skipped"
                ),
            );
            return;
        }
        ExamplesSource::Missing => {
            warn_no_examples(diagnostics, "regex", name);
            return;
        }
    };

    let mut count = 0usize;
    // One feature record per pattern line, all sharing the item name.
    for pattern in drain_block(&block, "regex", name, diagnostics) {
        corpus.regex_features.push(RegexFeature {
            name: name.to_string(),
            pattern: pattern.to_string(),
        });
        count += 1;
    }
    if count == 0 {
        warn_no_examples(diagnostics, "regex", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTILINE_INTENT_EXAMPLES: &str = r#"version: "2.0"
nlu:
- intent: intent_name
  examples: |
    - how much CO2 will that use?
    - how much carbon will a one way flight from [new york]{"entity": "city", "role": "from"} to california produce?
"#;

    const INTENT_EXAMPLES_WITH_METADATA: &str = r#"version: "2.0"
nlu:
- intent: intent_name
  metadata:
  examples:
  - text: |
      how much CO2 will that use?
    metadata:
      sentiment: positive
  - text: |
      how much carbon will a one way flight from [new york]{"entity": "city", "role": "from"} to california produce?
"#;

    const SYNONYM_EXAMPLE: &str = r#"version: "2.0"
nlu:
- synonym: savings
  examples: |
    - pink pig
    - savings account
"#;

    const LOOKUP_EXAMPLE: &str = r#"version: "2.0"
nlu:
- lookup: additional_currencies
  examples: |
    - Peso
    - Euro
    - Dollar
"#;

    const REGEX_EXAMPLE: &str = r#"version: "2.0"
nlu:
- regex: zipcode
  examples: |
    - [0-9]{4}
    - [0-9]{5}
"#;

    #[test]
    fn test_multiline_intent_is_parsed() {
        let (corpus, diagnostics) = reads(MULTILINE_INTENT_EXAMPLES).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(corpus.examples.len(), 2);
        assert_eq!(corpus.examples[0].intent, corpus.examples[1].intent);
        assert!(corpus.synonyms.is_empty());
    }

    #[test]
    fn test_intent_with_metadata_examples() {
        let (corpus, diagnostics) = reads(INTENT_EXAMPLES_WITH_METADATA).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(corpus.examples.len(), 2);
        assert_eq!(corpus.examples[0].intent, corpus.examples[1].intent);
        assert!(corpus.examples[0].metadata.is_some());
        assert!(corpus.examples[1].metadata.is_none());
        assert!(corpus.synonyms.is_empty());
    }

    #[test]
    fn test_listed_example_entities_are_parsed() {
        let (corpus, _) = reads(INTENT_EXAMPLES_WITH_METADATA).unwrap();

        assert!(corpus.examples[0].entities.is_empty());
        assert_eq!(corpus.examples[1].entities.len(), 1);
        let example = &corpus.examples[1];
        assert_eq!(example.surface(&example.entities[0]), "new york");
    }

    #[test]
    fn test_missing_leading_marker_drops_line_with_one_warning() {
        let source = r#"version: "2.0"
nlu:
- intent: intent_name
  examples: |
    how much CO2 will that use?
    - how much carbon will a one way flight from [new york]{"entity": "city", "role": "from"} to california produce?
"#;
        let (corpus, diagnostics) = reads(source).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().code,
            "nlu::read::missing-example-marker"
        );
        assert_eq!(corpus.examples.len(), 1);
        assert!(corpus.synonyms.is_empty());
    }

    #[test]
    fn test_missing_version_warns_but_parses() {
        let source = "nlu:\n- intent: greet\n  examples: |\n    - hi\n";
        let (corpus, diagnostics) = reads(source).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().code,
            "nlu::read::missing-version"
        );
        assert_eq!(corpus.examples.len(), 1);
    }

    #[test]
    fn test_unquoted_version_warns_but_parses() {
        let source = "version: 2.0\nnlu:\n- intent: greet\n  examples: |\n    - hi\n";
        let (corpus, diagnostics) = reads(source).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().code,
            "nlu::read::unsupported-version"
        );
        assert_eq!(corpus.examples.len(), 1);
    }

    #[test]
    fn test_older_version_warns_but_parses() {
        let source = "version: \"1.0\"\nnlu:\n- intent: greet\n  examples: |\n    - hi\n";
        let (_, diagnostics) = reads(source).unwrap();

        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_minimal_valid_document() {
        let source = "version: '2.0'\nnlu:\nstories:";
        let (corpus, diagnostics) = reads(source).unwrap();

        assert!(diagnostics.is_empty());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_wrong_format_is_fatal() {
        let result = reads("\n    !!\n    ");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_schema_is_fatal() {
        let source = "nlu:\n- intent: name\n  non_key: value\n";
        let result = reads(source);
        assert!(result.is_err());
    }

    #[test]
    fn test_synonyms_are_parsed() {
        let (corpus, diagnostics) = reads(SYNONYM_EXAMPLE).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(corpus.synonyms.len(), 2);
        assert_eq!(corpus.synonyms.get("pink pig"), Some("savings"));
        assert_eq!(corpus.synonyms.get("savings account"), Some("savings"));
    }

    #[test]
    fn test_synonyms_are_folded_from_annotations() {
        let source = r#"version: "2.0"
nlu:
- intent: intent_name
  examples: |
    - flight from [boston]{"entity": "city", "role": "from", "value": "bostn"}?
"#;
        let (corpus, diagnostics) = reads(source).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(corpus.synonyms.len(), 1);
        assert_eq!(corpus.synonyms.get("boston"), Some("bostn"));
    }

    #[test]
    fn test_equal_value_does_not_register_synonym() {
        let source = "nlu:\n- intent: i\n  examples: |\n    - a [boston](city:boston) flight\n";
        let (corpus, _) = reads(source).unwrap();

        assert!(corpus.synonyms.is_empty());
        assert_eq!(corpus.examples[0].entities[0].value.as_deref(), Some("boston"));
    }

    #[test]
    fn test_lookup_is_parsed() {
        let (corpus, diagnostics) = reads(LOOKUP_EXAMPLE).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(corpus.lookup_tables.len(), 1);
        assert_eq!(corpus.lookup_tables[0].name, "additional_currencies");
        assert_eq!(corpus.lookup_tables[0].elements.len(), 3);
    }

    #[test]
    fn test_regex_yields_one_record_per_pattern() {
        let (corpus, diagnostics) = reads(REGEX_EXAMPLE).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(corpus.regex_features.len(), 2);
        assert_eq!(corpus.regex_features[0].name, "zipcode");
        assert_eq!(corpus.regex_features[0].pattern, "[0-9]{4}");
        assert_eq!(corpus.regex_features[1].name, "zipcode");
        assert_eq!(corpus.regex_features[1].pattern, "[0-9]{5}");
    }

    #[test]
    fn test_empty_item_warns() {
        let source = "version: \"2.0\"\nnlu:\n- lookup: currencies\n  examples: |\n";
        let (corpus, diagnostics) = reads(source).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.iter().next().unwrap().code, "nlu::read::no-examples");
        assert!(corpus.lookup_tables.is_empty());
    }

    #[test]
    fn test_synonym_with_listed_examples_is_skipped() {
        let source = "version: \"2.0\"\nnlu:\n- synonym: savings\n  examples:\n  - text: |\n      pink pig\n";
        let (corpus, diagnostics) = reads(source).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().code,
            "nlu::read::unexpected-examples-shape"
        );
        assert!(corpus.synonyms.is_empty());
    }

    #[test]
    fn test_entity_counts_in_context() {
        let cases: &[(&str, usize)] = &[
            (
                "I need an [economy class](travel_flight_class:economy) ticket from \
                 [boston]{\"entity\": \"city\", \"role\": \"from\"} to [new york]{\"entity\": \"city\", \
                 \"role\": \"to\"}, please.",
                3,
            ),
            ("i'm looking for a place to eat", 0),
            ("i'm looking for a place in the [north](loc-direction) of town", 1),
            ("show me [chines](cuisine:chinese) restaurants", 1),
            ("Do you know {ABC} club?", 0),
            (
                "I want to fly from [Berlin]{\"entity\": \"city\", \"role\": \"to\"} to \
                 [LA]{\"entity\": \"city\", \"role\": \"from\", \"value\": \"Los Angeles\"}",
                2,
            ),
        ];

        for (example, expected) in cases {
            let source =
                format!("nlu:\n- intent: test-intent\n  examples: |\n    - {example}\n");
            let (corpus, _) = reads(&source).unwrap();

            assert_eq!(corpus.examples.len(), 1, "for {example:?}");
            let parsed = &corpus.examples[0];
            assert_eq!(parsed.intent.as_deref(), Some("test-intent"));
            assert_eq!(parsed.entities.len(), *expected, "for {example:?}");
        }
    }

    #[test]
    fn test_entity_offsets_are_valid() {
        let (corpus, _) = reads(MULTILINE_INTENT_EXAMPLES).unwrap();

        for example in &corpus.examples {
            for span in &example.entities {
                assert!(span.start <= span.end);
                assert!(span.end <= example.text.len());
            }
        }
    }

    #[test]
    fn test_document_order_is_preserved() {
        let source = r#"version: "2.0"
nlu:
- intent: greet
  examples: |
    - hi
- lookup: currencies
  examples: |
    - Peso
- intent: bye
  examples: |
    - bye now
"#;
        let (corpus, _) = reads(source).unwrap();

        assert_eq!(corpus.examples.len(), 2);
        assert_eq!(corpus.examples[0].intent.as_deref(), Some("greet"));
        assert_eq!(corpus.examples[1].intent.as_deref(), Some("bye"));
        assert_eq!(corpus.lookup_tables.len(), 1);
    }

    #[test]
    fn test_is_nlu_document() {
        assert!(is_nlu_document("nlu:\n- intent: greet\n"));
        assert!(is_nlu_document("version: \"2.0\"\nnlu:\n"));
        assert!(!is_nlu_document("stories:\n- story: a path\n"));
        assert!(!is_nlu_document("plain text"));
        assert!(!is_nlu_document(": not yaml ["));
    }
}
