//! Reader-side modules for the nlu document dialect.
//!
//! Reading a document is a pipeline over the decoded YAML tree:
//!
//! 1. [`schema`] validates document and item shape into [`NluItem`]s
//! 2. [`block`] splits multi-line example blocks into lines
//! 3. [`annotation`] parses inline entity markup out of each line
//! 4. [`reads`] orchestrates the three into a [`crate::TrainingCorpus`]
//!
//! # Usage
//!
//! ```ignore
//! use nlu_yaml::reads;
//!
//! let source = std::fs::read_to_string("data/nlu.yml")?;
//! let (corpus, diagnostics) = reads(&source)?;
//!
//! for warning in diagnostics.iter() {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod annotation;
pub mod block;
pub mod schema;

mod reader;

// Re-export main entry points
pub use annotation::{parse_annotated_line, AnnotatedLine};
pub use block::{ExampleLines, EXAMPLE_MARKER};
pub use reader::{is_nlu_document, reads, LATEST_TRAINING_DATA_FORMAT_VERSION};
pub use schema::{ExamplesSource, ListedExample, NluDocument, NluItem};
