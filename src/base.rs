use std::fmt;

/// Document identifier, as stored in the bitmap
pub type DocId = u32;

/// A relevance score
pub type Score = f64;

/// Milliseconds since the epoch
pub type Timestamp = i64;

/// Skip score used when the caller never configured one.
///
/// Relevance scores are never negative, so callers can tell
/// that no override was produced.
pub const UNSET_SCORE: Score = -1.0;

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits a document ID into its container key (high 16 bits)
/// and its value within the container (low 16 bits)
#[inline]
pub fn split_doc_id(doc_id: DocId) -> (u16, u16) {
    ((doc_id >> 16) as u16, (doc_id & 0xFFFF) as u16)
}

/// Inverse of [`split_doc_id`]
#[inline]
pub fn join_doc_id(key: u16, low: u16) -> DocId {
    ((key as DocId) << 16) | low as DocId
}

/// Scoring outcome for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Use the caller's original relevance score
    Fallback,

    /// Replace the relevance score
    Override(Score),
}

impl Decision {
    /// Resolves the decision against the original score
    pub fn apply(self, original: Score) -> Score {
        match self {
            Decision::Fallback => original,
            Decision::Override(score) => score,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Decision::Override(_))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Decision::Fallback => write!(f, "fallback"),
            Decision::Override(score) => write!(f, "override({})", score),
        }
    }
}
