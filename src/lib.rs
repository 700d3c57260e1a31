//! Skip scores for documents listed in a serialized Roaring bitmap
//!
//! A search script receives a base64-encoded Roaring bitmap of document
//! identifiers. For each scored document, the identifier (read from a
//! field) is looked up in the bitmap; members get a fixed skip score,
//! possibly vetoed by a comparison on a date field, while other documents
//! keep their original score.
//!
//! ## Architecture
//!
//! - [`utils::buffer`]: forward-only reader over the payload bytes
//! - [`bitmap`]: decoding of the portable Roaring format and membership queries
//! - [`scoring`]: parameters, document field access and the per-document decision
//! - [`script`]: engine front-end (compile once, one scorer per search leaf)
//!
//! ## Usage
//!
//! ```ignore
//! use roaring_skiplist::script::SkipListEngine;
//!
//! let factory = SkipListEngine::new().compile("roaring", &params)?;
//! let scorer = factory.new_leaf();
//! let score = scorer.score(&document, original_score);
//! ```

pub mod base;
pub mod bitmap;
pub mod error;
pub mod scoring;
pub mod script;
pub mod utils;

mod tests;

pub use base::{Decision, DocId, Score, UNSET_SCORE};
pub use bitmap::RoaringBitmap;
pub use error::{ConfigurationError, DecodeError, FieldAccessError};
pub use scoring::{ScoringParams, SkipListScorer};
pub use script::{RoaringScriptFactory, SkipListEngine};
