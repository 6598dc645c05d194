//! # umw-core
//!
//! Core types, identity keys, and error types for Umwelt.
//!
//! This crate provides the foundational types shared across all Umwelt crates:
//! - Entity structs for species records, family profiles, and graph elements
//! - Closed enumerations (modality domain, mechanism level, presence, ...)
//! - Profile key and graph node ID derivation
//! - The fixed unit conversion table
//! - Trail operation envelope for JSONL persistence
//! - Merge outcome and CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod outcome;
pub mod responses;
pub mod trail;
pub mod units;
