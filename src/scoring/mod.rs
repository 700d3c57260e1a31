//! Skip score decision for documents whose identifier is in a bitmap

pub mod document;
pub mod engine;
pub mod params;

pub use document::{DocumentFields, FieldValues, InMemoryDocument};
pub use engine::{parse_doc_id, FallbackReason, SkipListScorer};
pub use params::{Comparator, ScoringParams, SecondaryGate};
