//! Read-only Roaring bitmap of document IDs
//!
//! A 32-bit ID is split into a 16-bit key (high bits) selecting a container
//! and a 16-bit value (low bits) stored in the container. Containers are
//! arrays, dense bitmaps or runs, as decided by whoever serialized the
//! bitmap: the decoder never converts between encodings.
//!
//! The bitmap is built once and then only queried, so it can be shared
//! across threads without locking.

pub mod container;
pub mod format;

use log::{debug, warn};

use self::container::Container;
use crate::{
    base::{join_doc_id, split_doc_id, DocId, Len},
    error::DecodeError,
    utils::buffer::ByteBufferReader,
};

#[derive(Debug, Clone, Default)]
pub struct RoaringBitmap {
    /// Strictly ascending container keys
    keys: Vec<u16>,

    /// Containers, aligned with keys
    containers: Vec<Container>,
}

impl RoaringBitmap {
    /// A bitmap without any container
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes a serialized bitmap
    pub fn deserialize(data: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteBufferReader::new(data);
        Self::read_from(&mut reader)
    }

    /// Decodes a bitmap from the current position of the reader
    pub fn read_from(reader: &mut ByteBufferReader) -> Result<Self, DecodeError> {
        let (keys, containers) = format::read_containers(reader)?;
        let bitmap = Self { keys, containers };
        debug!(
            "Decoded bitmap with {} containers ({} documents)",
            bitmap.container_count(),
            bitmap.cardinality()
        );
        Ok(bitmap)
    }

    /// Decodes a serialized bitmap, or returns an empty bitmap
    /// if the payload is malformed
    pub fn deserialize_or_empty(data: &[u8]) -> Self {
        match Self::deserialize(data) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!(
                    "Could not decode bitmap ({} bytes), using an empty one: {}",
                    data.len(),
                    e
                );
                Self::empty()
            }
        }
    }

    /// Returns true if the document ID is in the set
    pub fn contains(&self, doc_id: DocId) -> bool {
        let (key, low) = split_doc_id(doc_id);
        match self.keys.binary_search(&key) {
            Ok(ix) => self.containers[ix].contains(low),
            Err(_) => false,
        }
    }

    /// Number of document IDs in the set
    pub fn cardinality(&self) -> u64 {
        self.containers
            .iter()
            .map(|c| c.cardinality() as u64)
            .sum()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Returns the container for a given key
    pub fn container(&self, key: u16) -> Option<&Container> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|ix| &self.containers[ix])
    }

    /// Iterates over the document IDs in ascending order
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = DocId> + 'a {
        self.keys
            .iter()
            .zip(self.containers.iter())
            .flat_map(|(&key, container)| container.iter().map(move |low| join_doc_id(key, low)))
    }
}

impl Len for RoaringBitmap {
    /// Number of containers
    fn len(&self) -> usize {
        self.containers.len()
    }
}
