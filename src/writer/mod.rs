//! Canonical writer.
//!
//! Renders a [`TrainingCorpus`] back to the minimal markup that produces
//! it: examples re-grouped by intent in first-seen order, then synonym,
//! regex and lookup items. For corpora that originated from canonical
//! markup the output round-trips byte-for-byte modulo outer whitespace.
//!
//! The canonical subset (literal block scalars, the double-quoted version
//! scalar) is rendered directly because the generic YAML emitter cannot
//! be told to use those styles; opaque metadata subtrees still go through
//! `serde_yaml`.

mod markup;

use std::collections::HashSet;

use serde_yaml::Value;

use crate::parser::LATEST_TRAINING_DATA_FORMAT_VERSION;
use crate::types::{Example, TrainingCorpus};

pub use markup::render_annotated_text;

/// Render a corpus to its canonical document text.
///
/// Total over the data model: rendering never fails.
pub fn dumps(corpus: &TrainingCorpus) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "version: \"{LATEST_TRAINING_DATA_FORMAT_VERSION}\"\n"
    ));
    out.push_str("nlu:\n");

    for (intent, examples) in group_by_intent(corpus) {
        push_intent_item(&mut out, intent, &examples);
    }

    push_synonym_items(&mut out, corpus);
    push_regex_items(&mut out, corpus);
    push_lookup_items(&mut out, corpus);

    out
}

/// Group examples by intent, preserving first-seen intent order and
/// relative example order. Examples without an intent cannot be
/// expressed in this dialect and are skipped.
fn group_by_intent(corpus: &TrainingCorpus) -> Vec<(&str, Vec<&Example>)> {
    corpus
        .intents()
        .into_iter()
        .map(|intent| {
            let members = corpus
                .examples
                .iter()
                .filter(|example| example.intent.as_deref() == Some(intent))
                .collect();
            (intent, members)
        })
        .collect()
}

fn push_intent_item(out: &mut String, intent: &str, examples: &[&Example]) {
    out.push_str(&format!("- intent: {intent}\n"));

    if examples.iter().all(|example| example.metadata.is_none()) {
        out.push_str("  examples: |\n");
        for example in examples {
            out.push_str("    - ");
            out.push_str(&render_annotated_text(example));
            out.push('\n');
        }
        return;
    }

    // At least one example carries metadata: use the list shape.
    out.push_str("  examples:\n");
    for example in examples {
        out.push_str("  - text: |\n      ");
        out.push_str(&render_annotated_text(example));
        out.push('\n');
        if let Some(metadata) = &example.metadata {
            push_metadata(out, metadata);
        }
    }
}

/// Render an opaque metadata tree nested under an examples entry.
fn push_metadata(out: &mut String, metadata: &Value) {
    let rendered =
        serde_yaml::to_string(metadata).expect("metadata tree serializes as YAML");
    match metadata {
        Value::Mapping(_) | Value::Sequence(_) => {
            out.push_str("    metadata:\n");
            for line in rendered.lines() {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str("      ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        _ => {
            out.push_str("    metadata: ");
            out.push_str(rendered.trim_end());
            out.push('\n');
        }
    }
}

/// Render standalone synonym items for mappings not already implied by a
/// rendered inline annotation, grouped by canonical value in first-seen
/// order.
fn push_synonym_items(out: &mut String, corpus: &TrainingCorpus) {
    let implied: HashSet<(&str, &str)> = corpus
        .examples
        .iter()
        .flat_map(|example| example.synonym_pairs())
        .collect();

    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for (surface, value) in corpus.synonyms.iter() {
        if implied.contains(&(surface, value)) {
            continue;
        }
        match groups.iter_mut().find(|(name, _)| *name == value) {
            Some((_, surfaces)) => surfaces.push(surface),
            None => groups.push((value, vec![surface])),
        }
    }

    for (value, surfaces) in groups {
        out.push_str(&format!("- synonym: {value}\n  examples: |\n"));
        for surface in surfaces {
            out.push_str(&format!("    - {surface}\n"));
        }
    }
}

/// Render regex items, one per distinct name, re-grouping the per-pattern
/// records back into one block of pattern lines.
fn push_regex_items(out: &mut String, corpus: &TrainingCorpus) {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for feature in &corpus.regex_features {
        match groups.iter_mut().find(|(name, _)| *name == feature.name) {
            Some((_, patterns)) => patterns.push(&feature.pattern),
            None => groups.push((&feature.name, vec![&feature.pattern])),
        }
    }

    for (name, patterns) in groups {
        out.push_str(&format!("- regex: {name}\n  examples: |\n"));
        for pattern in patterns {
            out.push_str(&format!("    - {pattern}\n"));
        }
    }
}

/// Render lookup items, one per distinct name.
fn push_lookup_items(out: &mut String, corpus: &TrainingCorpus) {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for table in &corpus.lookup_tables {
        let elements = table.elements.iter().map(String::as_str);
        match groups.iter_mut().find(|(name, _)| *name == table.name) {
            Some((_, members)) => members.extend(elements),
            None => groups.push((&table.name, elements.collect())),
        }
    }

    for (name, elements) in groups {
        out.push_str(&format!("- lookup: {name}\n  examples: |\n"));
        for element in elements {
            out.push_str(&format!("    - {element}\n"));
        }
    }
}
