//! # umw-merge
//!
//! Folds a newly validated and normalized record into the stored profile for
//! the same entity. Both variants prefer more complete data and never discard
//! recorded evidence. Only metadata (`data_quality_flag`, `confidence`,
//! `generated_at`) is overwritten by the latest pass.
//!
//! Merging never fails on content. Every merge returns a
//! [`MergeOutcome`](umw_core::outcome::MergeOutcome) describing what changed.

mod family;
mod species;

pub use family::{merge_family, seed_family};
pub use species::{merge_species, seed_species};
