//! Minimal entity-markup rendering.
//!
//! The inverse of the annotation grammar's default filling: spans whose
//! optional attributes were never given must not gain spurious keys on
//! output, so the shortest form that still carries every set attribute
//! wins.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::types::{EntitySpan, Example};

/// JSON formatter writing `", "` and `": "` separators, the object style
/// of hand-authored annotations.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Structured-form attribute object; key order is the canonical one.
#[derive(Serialize)]
struct EntityObject<'a> {
    entity: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

/// Re-insert an example's entity markup at its recorded offsets.
///
/// Rendering is total: a span that overlaps an earlier one, is out of
/// order, or falls outside the text cannot be re-inserted and is skipped,
/// leaving its surface as plain text.
pub fn render_annotated_text(example: &Example) -> String {
    let mut out = String::with_capacity(example.text.len());
    let mut cursor = 0;
    for span in &example.entities {
        if span.start < cursor || span.end > example.text.len() || span.start > span.end {
            continue;
        }
        out.push_str(&example.text[cursor..span.start]);
        render_span(&mut out, example.surface(span), span);
        cursor = span.end;
    }
    out.push_str(&example.text[cursor..]);
    out
}

/// Render one span in its minimal markup form.
fn render_span(out: &mut String, surface: &str, span: &EntitySpan) {
    out.push('[');
    out.push_str(surface);
    out.push(']');

    if span.role.is_none() && span.group.is_none() {
        match span.value.as_deref() {
            // Surface text is already the canonical value.
            None => {
                out.push('(');
                out.push_str(&span.entity_type);
                out.push(')');
                return;
            }
            Some(value) if value == surface => {
                out.push('(');
                out.push_str(&span.entity_type);
                out.push(')');
                return;
            }
            Some(value) => {
                out.push('(');
                out.push_str(&span.entity_type);
                out.push(':');
                out.push_str(value);
                out.push(')');
                return;
            }
        }
    }

    let object = EntityObject {
        entity: &span.entity_type,
        role: span.role.as_deref(),
        group: span.group.as_deref(),
        value: span.value.as_deref(),
    };
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    object
        .serialize(&mut serializer)
        .expect("entity attribute object serializes as JSON");
    out.push_str(&String::from_utf8(buf).expect("serde_json emits UTF-8"));
}
