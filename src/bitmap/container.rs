//! The three container encodings of a 16-bit bucket

use std::fmt;

/// Number of 64-bit words in a dense container (65536 bits)
pub const BITMAP_WORDS: usize = 1024;

/// Containers holding more values than this are stored as dense bitmaps
pub const ARRAY_MAX_CARDINALITY: usize = 4096;

/// An interval of consecutive values, `start..=start + length`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u16,
    pub length: u16,
}

impl Interval {
    /// Last value of the interval (past 65535 only if built by hand)
    #[inline]
    pub fn end(&self) -> u32 {
        self.start as u32 + self.length as u32
    }

    #[inline]
    pub fn contains(&self, value: u16) -> bool {
        value >= self.start && value - self.start <= self.length
    }
}

/// Values of a bucket (low 16 bits of the document IDs)
#[derive(Clone)]
pub enum Container {
    /// Sorted values, no duplicates
    Array(Vec<u16>),

    /// One bit per possible value
    Bitmap(Box<[u64; BITMAP_WORDS]>),

    /// Sorted, non-overlapping intervals
    Run(Vec<Interval>),
}

impl Container {
    pub fn contains(&self, value: u16) -> bool {
        match self {
            Container::Array(values) => values.binary_search(&value).is_ok(),
            Container::Bitmap(words) => {
                let word = words[(value >> 6) as usize];
                (word >> (value & 63)) & 1 == 1
            }
            Container::Run(runs) => {
                // Last interval starting at or before the value
                let ix = runs.partition_point(|run| run.start <= value);
                ix > 0 && runs[ix - 1].contains(value)
            }
        }
    }

    /// Number of values in the container
    pub fn cardinality(&self) -> usize {
        match self {
            Container::Array(values) => values.len(),
            Container::Bitmap(words) => words.iter().map(|w| w.count_ones() as usize).sum(),
            Container::Run(runs) => runs.iter().map(|run| run.length as usize + 1).sum(),
        }
    }

    /// Iterates over the values in ascending order
    pub fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = u16> + 'a> {
        match self {
            Container::Array(values) => Box::new(values.iter().copied()),
            Container::Bitmap(words) => Box::new(words.iter().enumerate().flat_map(|(ix, &word)| {
                let base = (ix as u32) << 6;
                (0..64u32)
                    .filter(move |bit| (word >> bit) & 1 == 1)
                    .map(move |bit| (base + bit) as u16)
            })),
            Container::Run(runs) => {
                Box::new(runs.iter().flat_map(|run| {
                    (run.start as u32..=run.end().min(u16::MAX as u32)).map(|v| v as u16)
                }))
            }
        }
    }

    /// Short name of the encoding
    pub fn kind(&self) -> &'static str {
        match self {
            Container::Array(_) => "array",
            Container::Bitmap(_) => "bitmap",
            Container::Run(_) => "run",
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(cardinality: {})", self.kind(), self.cardinality())
    }
}
