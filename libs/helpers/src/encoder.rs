//! Reference encoder producing portable Roaring payloads for tests

use std::collections::{BTreeMap, BTreeSet};

use base64::{engine::general_purpose::STANDARD, Engine};
use byteorder::{LittleEndian, WriteBytesExt};

const SERIAL_COOKIE_NO_RUNCONTAINER: u32 = 12346;
const SERIAL_COOKIE: u32 = 12347;
const NO_OFFSET_THRESHOLD: usize = 4;
pub const ARRAY_MAX_CARDINALITY: usize = 4096;

/// A set of document IDs, serialized the way Roaring libraries do
#[derive(Default, Clone)]
pub struct TestBitmap {
    buckets: BTreeMap<u16, BTreeSet<u16>>,

    /// Keys of the containers encoded as runs
    run_keys: BTreeSet<u16>,

    /// Use the run layout even without run containers
    run_layout: bool,
}

/// Sorted values to (start, length - 1) intervals
fn to_runs(values: &BTreeSet<u16>) -> Vec<(u16, u16)> {
    let mut runs: Vec<(u16, u16)> = Vec::new();
    for &v in values {
        match runs.last_mut() {
            Some((start, length)) if (*start as u32) + (*length as u32) + 1 == v as u32 => {
                *length += 1
            }
            _ => runs.push((v, 0)),
        }
    }
    runs
}

impl TestBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        let mut bitmap = Self::new();
        for id in ids {
            bitmap.insert(id);
        }
        bitmap
    }

    pub fn insert(&mut self, id: u32) {
        self.buckets
            .entry((id >> 16) as u16)
            .or_default()
            .insert(id as u16);
    }

    /// Encodes the container with the given key as runs
    pub fn with_run(mut self, key: u16) -> Self {
        self.run_keys.insert(key);
        self
    }

    /// Encodes all the containers as runs
    pub fn with_all_runs(mut self) -> Self {
        self.run_keys = self.buckets.keys().copied().collect();
        self
    }

    pub fn with_run_layout(mut self) -> Self {
        self.run_layout = true;
        self
    }

    pub fn ids(&self) -> Vec<u32> {
        self.buckets
            .iter()
            .flat_map(|(&key, values)| values.iter().map(move |&v| ((key as u32) << 16) | v as u32))
            .collect()
    }

    fn is_run(&self, key: u16) -> bool {
        self.run_keys.contains(&key)
    }

    fn body_size(&self, key: u16, values: &BTreeSet<u16>) -> usize {
        if self.is_run(key) {
            2 + 4 * to_runs(values).len()
        } else if values.len() > ARRAY_MAX_CARDINALITY {
            8192
        } else {
            2 * values.len()
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let count = self.buckets.len();
        let has_runs = count > 0 && (self.run_layout || !self.run_keys.is_empty());
        let mut out = Vec::new();

        if has_runs {
            out.write_u32::<LittleEndian>(SERIAL_COOKIE | (((count - 1) as u32) << 16))
                .unwrap();
            let mut flags = vec![0u8; (count + 7) / 8];
            for (ix, key) in self.buckets.keys().enumerate() {
                if self.is_run(*key) {
                    flags[ix / 8] |= 1 << (ix % 8);
                }
            }
            out.extend_from_slice(&flags);
        } else {
            out.write_u32::<LittleEndian>(SERIAL_COOKIE_NO_RUNCONTAINER)
                .unwrap();
            out.write_u32::<LittleEndian>(count as u32).unwrap();
        }

        for (&key, values) in self.buckets.iter() {
            out.write_u16::<LittleEndian>(key).unwrap();
            out.write_u16::<LittleEndian>((values.len() - 1) as u16)
                .unwrap();
        }

        if !has_runs || count >= NO_OFFSET_THRESHOLD {
            let mut offset = out.len() + 4 * count;
            for (&key, values) in self.buckets.iter() {
                out.write_u32::<LittleEndian>(offset as u32).unwrap();
                offset += self.body_size(key, values);
            }
        }

        for (&key, values) in self.buckets.iter() {
            if self.is_run(key) {
                let runs = to_runs(values);
                out.write_u16::<LittleEndian>(runs.len() as u16).unwrap();
                for (start, length) in runs {
                    out.write_u16::<LittleEndian>(start).unwrap();
                    out.write_u16::<LittleEndian>(length).unwrap();
                }
            } else if values.len() > ARRAY_MAX_CARDINALITY {
                let mut words = [0u64; 1024];
                for &v in values {
                    words[(v >> 6) as usize] |= 1 << (v & 63);
                }
                for word in words {
                    out.write_u64::<LittleEndian>(word).unwrap();
                }
            } else {
                for &v in values {
                    out.write_u16::<LittleEndian>(v).unwrap();
                }
            }
        }

        out
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.serialize())
    }
}
