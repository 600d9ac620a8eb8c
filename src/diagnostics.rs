//! Warning collection for corpus reading.
//!
//! Warnings are recoverable: the offending line or item is skipped and the
//! rest of the document is still parsed. They are accumulated per `reads`
//! call and returned alongside the corpus so the caller decides whether to
//! surface them. Fatal conditions use [`crate::NluError`] instead.

use std::fmt;

/// A single non-fatal warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Machine-readable code (e.g. "nlu::read::missing-version").
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
}

impl Warning {
    /// Create a warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to this warning.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.message)
    }
}

/// Collects warnings during a single parse call.
///
/// Owned by the reader and handed back to the caller; never a shared or
/// module-level registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning.
    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Add a warning from code and message.
    pub fn warn(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.push(Warning::new(code, message));
    }

    /// Check if no warnings were collected.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of collected warnings.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Iterate over collected warnings.
    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Warning;
    type IntoIter = std::vec::IntoIter<Warning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}
