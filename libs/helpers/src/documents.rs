use std::collections::HashMap;

use log::debug;
use rand::{seq::index::sample, Rng, RngCore};
use roaring_skiplist::scoring::InMemoryDocument;

use crate::encoder::TestBitmap;

pub const ID_FIELD: &str = "doc_id";
pub const DATE_FIELD: &str = "published";

/// Random documents, some of them listed in a bitmap
pub struct TestCorpus {
    pub bitmap: TestBitmap,
    pub documents: Vec<(u32, InMemoryDocument)>,
    pub dates: HashMap<u32, i64>,
}

impl TestCorpus {
    /// Creates `count` documents with IDs below `max_id`, lists
    /// `members` of them in the bitmap, and gives a date to
    /// roughly half of them
    pub fn new(count: usize, members: usize, max_id: u32, rng: &mut dyn RngCore) -> Self {
        let ids: Vec<u32> = sample(rng, max_id as usize, count)
            .into_iter()
            .map(|ix| ix as u32)
            .collect();

        let bitmap = TestBitmap::from_ids(ids.iter().take(members).copied());

        let mut dates = HashMap::new();
        let documents = ids
            .iter()
            .map(|&id| {
                let mut doc = InMemoryDocument::new().with_text(ID_FIELD, &id.to_string());
                if rng.gen_bool(0.5) {
                    let date = rng.gen_range(0..2_000i64);
                    dates.insert(id, date);
                    doc = doc.with_date(DATE_FIELD, date);
                }
                (id, doc)
            })
            .collect();

        debug!(
            "Created {} documents ({} in the bitmap, {} dated)",
            count,
            members,
            dates.len()
        );
        Self {
            bitmap,
            documents,
            dates,
        }
    }
}
