//! Entity structs for profiles and the derived graph.

pub mod claim;
pub mod family;
pub mod graph;
pub mod species;

pub use claim::{Evidence, Mechanism, QuantitativeData, SensoryClaim};
pub use family::{FamilyProfile, FrequencyRange, ModalityPrevalence, PrevalenceMerge};
pub use graph::{Edge, EdgeKey, Node};
pub use species::{Identity, SpeciesRecord, Taxonomy};
