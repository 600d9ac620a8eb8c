//! nlu-yaml - YAML NLU training-corpus transcoder
//!
//! A library for reading YAML training-data documents with inline entity
//! markup into an in-memory corpus, and for writing a corpus back out as
//! the minimal canonical markup that produced it.

pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use diagnostics::{Diagnostics, Warning};
pub use error::{NluError, Result};
pub use parser::{is_nlu_document, reads, LATEST_TRAINING_DATA_FORMAT_VERSION};
pub use types::{EntitySpan, Example, LookupTable, RegexFeature, SynonymMap, TrainingCorpus};
pub use writer::dumps;
