//! # umw-graph
//!
//! The derived node/edge view over stored profiles.
//!
//! - [`Graph`]: ordered container with deterministic identifiers and
//!   duplicate-insert suppression on `(source, target, relationship)`
//! - [`GraphBuilder`]: projects species records and family profiles into a graph
//! - [`analysis`]: aggregate queries over a built graph (summary, orders with a
//!   modality, order/modality matrix)
//!
//! The graph is never edited incrementally. It is rebuilt from profiles.

pub mod analysis;
pub mod builder;
pub mod graph;

pub use builder::{GraphBuilder, build_graph};
pub use graph::{Graph, GraphSnapshot};
