//! Core domain types for nlu-yaml.
//!
//! This module contains the in-memory model produced by the reader:
//! - `TrainingCorpus` - the aggregate model
//! - `Example` / `EntitySpan` - annotated utterances
//! - `SynonymMap`, `LookupTable`, `RegexFeature` - vocabulary tables

mod corpus;
mod example;

pub use corpus::{LookupTable, RegexFeature, SynonymMap, TrainingCorpus};
pub use example::{EntitySpan, Example};
