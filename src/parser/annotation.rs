//! Inline entity-annotation grammar.
//!
//! Recognizes the two markup forms inside a single example line:
//!
//! - Short form: `[surface](entity)` or `[surface](entity:value)`
//! - Structured form: `[surface]{"entity": ..., "role": ..., "group": ..., "value": ...}`
//!
//! Anything that does not complete a form is passed through as literal
//! text. Entity types are opaque tokens; they are never validated as
//! identifiers.

use serde::Deserialize;

use crate::error::{NluError, Result};
use crate::types::EntitySpan;

/// One example line with its markup stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    /// Plain text with every annotation replaced by its bare surface text.
    pub text: String,
    /// Spans in left-to-right order, with byte offsets into `text`.
    pub entities: Vec<EntitySpan>,
}

/// Attribute object of the structured form. Unknown keys are ignored,
/// matching the tolerant reading of the dialect.
#[derive(Debug, Deserialize)]
struct EntityAttributes {
    entity: Option<String>,
    role: Option<String>,
    group: Option<String>,
    value: Option<String>,
}

/// A recognized annotation token at the head of a slice.
struct Token<'a> {
    surface: &'a str,
    attributes: EntityAttributes,
    /// Total byte length of the markup token in the raw line.
    len: usize,
}

/// Parse one raw example line into plain text plus entity spans.
///
/// Scans left to right; at each `[` the first completable form wins.
/// Offsets are computed against the plain output, so each stripped token
/// shifts later spans left by the length of its markup overhead.
pub fn parse_annotated_line(line: &str) -> Result<AnnotatedLine> {
    let mut text = String::with_capacity(line.len());
    let mut entities = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let (before, candidate) = rest.split_at(open);
        text.push_str(before);

        match match_annotation(candidate)? {
            Some(token) => {
                let start = text.len();
                text.push_str(token.surface);
                let end = text.len();
                entities.push(span_from_attributes(start, end, token.attributes)?);
                rest = &candidate[token.len..];
            }
            None => {
                // Not an annotation: keep the '[' and rescan after it.
                text.push('[');
                rest = &candidate[1..];
            }
        }
    }
    text.push_str(rest);

    Ok(AnnotatedLine { text, entities })
}

/// Try to match a complete annotation at the head of `s` (which starts
/// with `[`). Returns `Ok(None)` when the text is not an annotation at
/// all; returns an error only for a matched structured form whose JSON
/// object is malformed or lacks `entity`.
fn match_annotation(s: &str) -> Result<Option<Token<'_>>> {
    let close = match s.find(']') {
        // Empty surface is not an annotation.
        Some(i) if i > 1 => i,
        _ => return Ok(None),
    };
    let surface = &s[1..close];
    let after = &s[close + 1..];

    if let Some(short) = after.strip_prefix('(') {
        let Some(end) = short.find(')') else {
            return Ok(None);
        };
        // The first colon splits entity type from an explicit value.
        let (entity_type, value) = match short[..end].split_once(':') {
            Some((entity_type, value)) => (entity_type, Some(value)),
            None => (&short[..end], None),
        };
        // An empty entity type or an empty explicit value is not an
        // annotation.
        if entity_type.is_empty() || value == Some("") {
            return Ok(None);
        }
        return Ok(Some(Token {
            surface,
            attributes: EntityAttributes {
                entity: Some(entity_type.to_string()),
                role: None,
                group: None,
                value: value.map(str::to_string),
            },
            // '[' + surface + ']' + '(' + inner + ')'
            len: close + 2 + end + 1,
        }));
    }

    if after.starts_with('{') {
        let Some(object_len) = match_json_object(after) else {
            return Ok(None);
        };
        let object = &after[..object_len];
        let attributes: EntityAttributes = serde_json::from_str(object).map_err(|e| {
            NluError::annotation_with_help(
                format!("invalid JSON in entity annotation {object}: {e}"),
                "Use a JSON object like [surface]{\"entity\": \"type\"}",
            )
        })?;
        return Ok(Some(Token {
            surface,
            attributes,
            len: close + 1 + object_len,
        }));
    }

    Ok(None)
}

/// Convert a matched attribute object into a span, enforcing the
/// required non-empty `entity` key.
fn span_from_attributes(start: usize, end: usize, attributes: EntityAttributes) -> Result<EntitySpan> {
    let entity_type = match attributes.entity {
        Some(entity) if !entity.is_empty() => entity,
        _ => {
            return Err(NluError::annotation_with_help(
                "entity annotation object is missing its required 'entity' key",
                "Add \"entity\": \"<type>\" to the annotation object",
            ));
        }
    };

    Ok(EntitySpan {
        start,
        end,
        entity_type,
        value: attributes.value,
        role: attributes.role,
        group: attributes.group,
    })
}

/// Length of the JSON object at the head of `s` (which starts with `{`),
/// including both braces. Braces inside quoted strings do not count;
/// backslash escapes inside strings are honoured. Returns `None` when the
/// object never closes.
fn match_json_object(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
