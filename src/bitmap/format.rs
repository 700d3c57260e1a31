//! Portable serialization format of Roaring bitmaps (decoding side)
//!
//! All integers are little-endian. The layout is:
//!
//! ```text
//! cookie            u32    12346 (no run containers), or
//!                          12347 | (count - 1) << 16
//! count             u32    only with the 12346 cookie
//! run flags         ceil(count / 8) bytes, only with the 12347 cookie
//! descriptors       count x (key u16, cardinality - 1 u16)
//! offsets           count x u32, absent when run flags are present
//!                   and count < 4
//! bodies            in key order:
//!                     run:    n u16, n x (start u16, length - 1 u16)
//!                     bitmap: 1024 x u64 (cardinality > 4096)
//!                     array:  cardinality x u16
//! ```

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;

use super::container::{Container, Interval, ARRAY_MAX_CARDINALITY, BITMAP_WORDS};
use crate::{error::DecodeError, utils::buffer::ByteBufferReader};

/// Cookie of the layout without run containers
pub const SERIAL_COOKIE_NO_RUNCONTAINER: u32 = 12346;

/// Cookie of the layout with run containers (low 16 bits only)
pub const SERIAL_COOKIE: u32 = 12347;

/// Below this number of containers, the run layout omits the offsets
pub const NO_OFFSET_THRESHOLD: usize = 4;

/// One container per possible 16-bit key
pub const MAX_CONTAINERS: u32 = 1 << 16;

/// Per-container metadata read before the bodies
struct Descriptor {
    key: u16,
    cardinality: usize,
    is_run: bool,
}

fn truncated(what: &str, expected: usize, available: usize) -> DecodeError {
    DecodeError::Truncated(format!(
        "{}: expected {} bytes, {} available",
        what, expected, available
    ))
}

/// Reads the cookie, and returns the number of containers and the run flags
fn read_header(reader: &mut ByteBufferReader) -> Result<(usize, Option<Vec<u8>>), DecodeError> {
    let cookie = reader.read_u32::<LittleEndian>()?;

    if cookie & 0xFFFF == SERIAL_COOKIE {
        let count = (cookie >> 16) as usize + 1;
        let mut flags = vec![0u8; (count + 7) / 8];
        reader.read_exact(&mut flags)?;
        Ok((count, Some(flags)))
    } else if cookie == SERIAL_COOKIE_NO_RUNCONTAINER {
        let count = reader.read_u32::<LittleEndian>()?;
        if count > MAX_CONTAINERS {
            return Err(DecodeError::TooManyContainers(count));
        }
        Ok((count as usize, None))
    } else {
        Err(DecodeError::InvalidCookie(cookie))
    }
}

fn read_descriptors(
    reader: &mut ByteBufferReader,
    count: usize,
    run_flags: Option<&[u8]>,
) -> Result<Vec<Descriptor>, DecodeError> {
    if reader.available() < 4 * count {
        return Err(truncated("descriptors", 4 * count, reader.available()));
    }

    let mut descriptors = Vec::with_capacity(count);
    let mut previous: Option<u16> = None;
    for ix in 0..count {
        let key = reader.read_u16::<LittleEndian>()?;
        let cardinality = reader.read_u16::<LittleEndian>()? as usize + 1;

        if let Some(previous) = previous {
            if key <= previous {
                return Err(DecodeError::UnorderedKeys { previous, key });
            }
        }
        previous = Some(key);

        let is_run = run_flags.map_or(false, |flags| flags[ix / 8] & (1 << (ix % 8)) != 0);
        descriptors.push(Descriptor {
            key,
            cardinality,
            is_run,
        });
    }

    Ok(descriptors)
}

fn read_array(
    reader: &mut ByteBufferReader,
    descriptor: &Descriptor,
) -> Result<Container, DecodeError> {
    let size = 2 * descriptor.cardinality;
    if reader.available() < size {
        return Err(truncated("array container", size, reader.available()));
    }

    let mut values = vec![0u16; descriptor.cardinality];
    reader.read_u16_into::<LittleEndian>(&mut values)?;

    if values.windows(2).any(|w| w[0] >= w[1]) {
        return Err(DecodeError::InvalidContainer {
            key: descriptor.key,
            message: "array values are not strictly ascending".to_string(),
        });
    }

    Ok(Container::Array(values))
}

fn read_bitmap(
    reader: &mut ByteBufferReader,
    descriptor: &Descriptor,
) -> Result<Container, DecodeError> {
    let size = 8 * BITMAP_WORDS;
    if reader.available() < size {
        return Err(truncated("bitmap container", size, reader.available()));
    }

    let mut words = Box::new([0u64; BITMAP_WORDS]);
    reader.read_u64_into::<LittleEndian>(&mut words[..])?;

    let container = Container::Bitmap(words);
    let cardinality = container.cardinality();
    if cardinality != descriptor.cardinality {
        return Err(DecodeError::InvalidContainer {
            key: descriptor.key,
            message: format!(
                "bitmap holds {} values, {} declared",
                cardinality, descriptor.cardinality
            ),
        });
    }

    Ok(container)
}

fn read_runs(
    reader: &mut ByteBufferReader,
    descriptor: &Descriptor,
) -> Result<Container, DecodeError> {
    let invalid = |message: String| DecodeError::InvalidContainer {
        key: descriptor.key,
        message,
    };

    let count = reader.read_u16::<LittleEndian>()? as usize;
    if reader.available() < 4 * count {
        return Err(truncated("run container", 4 * count, reader.available()));
    }

    let mut runs = Vec::with_capacity(count);
    let mut cardinality = 0;
    let mut previous_end: Option<u32> = None;
    for _ in 0..count {
        let start = reader.read_u16::<LittleEndian>()?;
        let length = reader.read_u16::<LittleEndian>()?;

        if start as u32 + length as u32 > u16::MAX as u32 {
            return Err(invalid(format!("run {}+{} overflows", start, length)));
        }
        if let Some(end) = previous_end {
            if start as u32 <= end {
                return Err(invalid(format!("run starting at {} overlaps", start)));
            }
        }

        let run = Interval { start, length };
        previous_end = Some(run.end());
        cardinality += length as usize + 1;
        runs.push(run);
    }

    if cardinality != descriptor.cardinality {
        return Err(invalid(format!(
            "runs hold {} values, {} declared",
            cardinality, descriptor.cardinality
        )));
    }

    Ok(Container::Run(runs))
}

/// Decodes a serialized bitmap into its sorted keys and containers
pub fn read_containers(
    reader: &mut ByteBufferReader,
) -> Result<(Vec<u16>, Vec<Container>), DecodeError> {
    let (count, run_flags) = read_header(reader)?;
    let descriptors = read_descriptors(reader, count, run_flags.as_deref())?;

    // Offsets are only useful for random access
    if run_flags.is_none() || count >= NO_OFFSET_THRESHOLD {
        let size = 4 * count;
        let available = reader.available();
        if reader.skip(size) < size {
            return Err(truncated("offsets", size, available));
        }
    }

    let mut keys = Vec::with_capacity(count);
    let mut containers = Vec::with_capacity(count);
    for descriptor in descriptors.iter() {
        let container = if descriptor.is_run {
            read_runs(reader, descriptor)?
        } else if descriptor.cardinality > ARRAY_MAX_CARDINALITY {
            read_bitmap(reader, descriptor)?
        } else {
            read_array(reader, descriptor)?
        };

        keys.push(descriptor.key);
        containers.push(container);
    }

    if reader.available() > 0 {
        debug!(
            "Ignoring {} trailing bytes after {} containers",
            reader.available(),
            count
        );
    }

    Ok((keys, containers))
}
