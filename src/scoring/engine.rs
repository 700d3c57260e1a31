//! Per-document skip score decision
//!
//! ```text
//! identifier ──parse──▶ member? ──no──▶ fallback
//!                          │yes
//!                          ▼
//!                   gate configured? ──no──▶ override
//!                          │yes
//!                          ▼
//!              secondary field absent ──▶ override
//!              comparator holds       ──▶ fallback
//!              otherwise              ──▶ override
//! ```
//!
//! Every failure (missing field, unreadable or unparsable value) only
//! affects the document being scored and results in a fallback.

use std::sync::Arc;

use log::trace;
use thiserror::Error;

use super::{document::DocumentFields, params::ScoringParams};
use crate::{
    base::{Decision, DocId, Score, Timestamp},
    bitmap::RoaringBitmap,
    error::FieldAccessError,
};

/// Why the original score was kept
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FallbackReason {
    #[error("no identifier")]
    MissingIdentifier,

    #[error("cannot read the identifier: {0}")]
    IdentifierAccess(FieldAccessError),

    #[error("identifier {0:?} is not a 32-bit integer")]
    InvalidIdentifier(String),

    #[error("document {0} is not in the bitmap")]
    NotMember(DocId),

    #[error("cannot read the secondary field: {0}")]
    SecondaryAccess(FieldAccessError),

    #[error("secondary value {stored} does not pass the gate (threshold {threshold})")]
    Gated {
        stored: Timestamp,
        threshold: Timestamp,
    },
}

/// Parses a base-10 identifier.
///
/// Identifiers are signed 32-bit integers; negative values map to their
/// two's complement bit pattern, as in Roaring bitmaps built from signed ints.
pub fn parse_doc_id(text: &str) -> Option<DocId> {
    text.parse::<i32>().ok().map(|v| v as DocId)
}

/// Decides the score of documents for one scoring session.
///
/// Immutable once built: the scorer can be shared between threads.
#[derive(Debug, Clone)]
pub struct SkipListScorer {
    params: Arc<ScoringParams>,
    bitmap: Arc<RoaringBitmap>,
}

impl SkipListScorer {
    pub fn new(params: Arc<ScoringParams>, bitmap: Arc<RoaringBitmap>) -> Self {
        Self { params, bitmap }
    }

    /// Decodes the payload of the parameters; a malformed payload
    /// gives a scorer that never overrides scores
    pub fn from_params(params: Arc<ScoringParams>) -> Self {
        let bitmap = RoaringBitmap::deserialize_or_empty(&params.payload);
        Self::new(params, Arc::new(bitmap))
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn bitmap(&self) -> &RoaringBitmap {
        &self.bitmap
    }

    fn read_identifier(&self, doc: &dyn DocumentFields) -> Result<DocId, FallbackReason> {
        let text = doc
            .string_value(&self.params.field)
            .map_err(FallbackReason::IdentifierAccess)?
            .ok_or(FallbackReason::MissingIdentifier)?;
        parse_doc_id(&text).ok_or(FallbackReason::InvalidIdentifier(text))
    }

    /// Returns the skip score, or the reason why the original score is kept
    pub fn evaluate(&self, doc: &dyn DocumentFields) -> Result<Score, FallbackReason> {
        let doc_id = self.read_identifier(doc)?;
        if !self.bitmap.contains(doc_id) {
            return Err(FallbackReason::NotMember(doc_id));
        }

        if let Some(gate) = &self.params.gate {
            // A document without the field is not gated
            let stored = doc
                .date_millis(&gate.field)
                .map_err(FallbackReason::SecondaryAccess)?;
            if let Some(stored) = stored {
                if gate.blocks(stored) {
                    return Err(FallbackReason::Gated {
                        stored,
                        threshold: gate.threshold,
                    });
                }
            }
        }

        Ok(self.params.effective_skip_score())
    }

    pub fn decide(&self, doc: &dyn DocumentFields) -> Decision {
        match self.evaluate(doc) {
            Ok(score) => Decision::Override(score),
            Err(reason) => {
                trace!("Keeping the original score: {}", reason);
                Decision::Fallback
            }
        }
    }

    /// Score of the document given its original relevance score
    pub fn score(&self, doc: &dyn DocumentFields, original: Score) -> Score {
        self.decide(doc).apply(original)
    }
}
