//! # umw-schema
//!
//! Candidate record validation and JSON Schema registry for Umwelt.
//!
//! This crate provides:
//! - [`Validator`]: the single fallible entry point turning an untyped
//!   candidate (`serde_json::Value`) into a typed `SpeciesRecord` or
//!   `FamilyProfile`, repairing what can be repaired and rejecting the rest
//!   with a [`SchemaViolation`]
//! - [`SchemaRegistry`]: JSON Schemas for every persisted and public type,
//!   used for trail validation and `umw schema` export
//!
//! Downstream stages assume validated records and never re-validate.

pub mod error;
pub mod registry;
pub mod validator;

pub use error::{SchemaError, SchemaViolation};
pub use registry::SchemaRegistry;
pub use validator::Validator;
