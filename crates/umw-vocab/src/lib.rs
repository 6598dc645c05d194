//! # umw-vocab
//!
//! Rewrites free-text modality labels into the seven canonical modality
//! names and converts quantitative units to base units.
//!
//! A [`Vocabulary`] is built once (built-in table plus configured synonyms)
//! and injected into a [`Normalizer`]. The normalizer works on single records
//! before merge and, as a batch pass, on an already-built graph. Both passes
//! are idempotent.

mod error;
mod normalizer;
mod vocabulary;

pub use error::VocabularyError;
pub use normalizer::Normalizer;
pub use vocabulary::{Vocabulary, fold_label};
