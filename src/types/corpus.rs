//! The aggregate training-corpus model.

use super::example::Example;

/// Surface-text to canonical-value synonym mapping.
///
/// Keys are unique and keep their first-insertion position; registering an
/// existing key overwrites its value in place (last write wins). Insertion
/// order matters for the canonical writer, which re-groups entries into
/// synonym items in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynonymMap {
    entries: Vec<(String, String)>,
}

impl SynonymMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synonym, overwriting any prior value for the surface.
    pub fn register(&mut self, surface: impl Into<String>, value: impl Into<String>) {
        let surface = surface.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(s, _)| *s == surface) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((surface, value)),
        }
    }

    /// Look up the canonical value for a surface text.
    pub fn get(&self, surface: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == surface)
            .map(|(_, v)| v.as_str())
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no synonyms are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(surface, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, v)| (s.as_str(), v.as_str()))
    }
}

/// A named gazetteer vocabulary list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    pub name: String,
    pub elements: Vec<String>,
}

/// One named regex pattern.
///
/// A regex item with N pattern lines yields N features sharing one name,
/// never one feature with N patterns. The pattern is an opaque string;
/// its regex syntax is not validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexFeature {
    pub name: String,
    pub pattern: String,
}

/// The in-memory training corpus built by one reader invocation.
///
/// Immutable once built; the writer only reads it. All sequences preserve
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingCorpus {
    /// All intent examples, in document order.
    pub examples: Vec<Example>,
    /// Surface → canonical value mapping, from synonym items and from
    /// inline annotations carrying an explicit differing value.
    pub synonyms: SynonymMap,
    /// Lookup tables, in document order.
    pub lookup_tables: Vec<LookupTable>,
    /// Regex features, one per pattern line, in document order.
    pub regex_features: Vec<RegexFeature>,
}

impl TrainingCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the corpus holds no data at all.
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
            && self.synonyms.is_empty()
            && self.lookup_tables.is_empty()
            && self.regex_features.is_empty()
    }

    /// Distinct intent names in first-seen order.
    pub fn intents(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for example in &self.examples {
            if let Some(intent) = example.intent.as_deref() {
                if !seen.contains(&intent) {
                    seen.push(intent);
                }
            }
        }
        seen
    }
}
