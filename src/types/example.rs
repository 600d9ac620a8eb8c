//! Annotated utterance examples.

/// One entity annotation inside an example's plain text.
///
/// `start` and `end` are byte offsets into [`Example::text`] after all
/// markup has been stripped, so `0 <= start <= end <= text.len()` always
/// holds for spans produced by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    /// Byte offset of the first byte of the annotated surface text.
    pub start: usize,
    /// Byte offset one past the last byte of the annotated surface text.
    pub end: usize,
    /// Entity type. An opaque, non-empty token; never validated as an
    /// identifier.
    pub entity_type: String,
    /// Explicit canonical value. `None` means the surface text itself is
    /// the canonical value.
    pub value: Option<String>,
    /// Optional slot role ("from"/"to" style disambiguator).
    pub role: Option<String>,
    /// Optional entity group disambiguator.
    pub group: Option<String>,
}

impl EntitySpan {
    /// Create a span with no explicit value, role or group.
    pub fn new(start: usize, end: usize, entity_type: impl Into<String>) -> Self {
        Self {
            start,
            end,
            entity_type: entity_type.into(),
            value: None,
            role: None,
            group: None,
        }
    }

    /// Set the explicit canonical value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// One training utterance with its annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Plain utterance text with all markup stripped.
    pub text: String,
    /// Intent this example belongs to, if it came from an intent item.
    pub intent: Option<String>,
    /// Entity spans in left-to-right order.
    pub entities: Vec<EntitySpan>,
    /// Opaque per-example metadata carried through from the document.
    pub metadata: Option<serde_yaml::Value>,
}

impl Example {
    /// Create an example with no annotations.
    pub fn new(text: impl Into<String>, intent: Option<String>) -> Self {
        Self {
            text: text.into(),
            intent,
            entities: Vec::new(),
            metadata: None,
        }
    }

    /// The surface text a span covers.
    ///
    /// Panics if the span does not point into this example's text; spans
    /// built by the reader always do.
    pub fn surface(&self, span: &EntitySpan) -> &str {
        &self.text[span.start..span.end]
    }

    /// Synonym registrations implied by this example's annotations:
    /// every `(surface, value)` pair where an explicit value differs from
    /// the annotated surface text.
    pub fn synonym_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entities.iter().filter_map(|span| {
            let surface = self.surface(span);
            match span.value.as_deref() {
                Some(value) if value != surface => Some((surface, value)),
                _ => None,
            }
        })
    }
}
