//! Example-block splitting.
//!
//! The `examples` key of an item holds one multi-line string where each
//! example line carries the leading `- ` marker. Splitting is a lazy,
//! single-pass iteration; a block is consumed once per item.

/// The required prefix of an example line inside a block.
pub const EXAMPLE_MARKER: &str = "- ";

/// Iterator over the example lines of one block.
///
/// Blank lines are skipped silently. A non-empty line without the leading
/// marker is dropped but remembered, so the caller can emit a single
/// "missing marker" warning per block after draining the iterator.
#[derive(Debug)]
pub struct ExampleLines<'a> {
    lines: std::str::Lines<'a>,
    saw_unmarked: bool,
}

impl<'a> ExampleLines<'a> {
    /// Start iterating over a raw example block.
    pub fn new(block: &'a str) -> Self {
        Self {
            lines: block.lines(),
            saw_unmarked: false,
        }
    }

    /// Whether any non-blank line lacked the leading marker so far.
    ///
    /// Meaningful once the iterator is drained.
    pub fn saw_unmarked(&self) -> bool {
        self.saw_unmarked
    }
}

impl<'a> Iterator for ExampleLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        for line in &mut self.lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.strip_prefix(EXAMPLE_MARKER) {
                Some(example) => return Some(example),
                None => self.saw_unmarked = true,
            }
        }
        None
    }
}
