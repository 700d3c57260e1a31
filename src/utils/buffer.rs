//! Sequential reading over an in-memory byte buffer

use std::io::Read;

/// Forward-only reader over a borrowed byte slice.
///
/// Each decode owns its own reader; there is no mark/rewind.
pub struct ByteBufferReader<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> ByteBufferReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteBufferReader { data, index: 0 }
    }

    /// Current cursor position
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of bytes not yet read
    #[inline]
    pub fn available(&self) -> usize {
        self.data.len() - self.index
    }

    /// Returns the next byte, or `None` at the end of the stream
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.index)?;
        self.index += 1;
        Some(byte)
    }

    /// Copies at most `max_len` bytes into `dest[offset..]` and returns
    /// the number of copied bytes (0 once the stream is exhausted)
    pub fn read_into(&mut self, dest: &mut [u8], offset: usize, max_len: usize) -> usize {
        let room = dest.len().saturating_sub(offset);
        let len = max_len.min(self.available()).min(room);
        if len == 0 {
            return 0;
        }

        dest[offset..offset + len].copy_from_slice(&self.data[self.index..self.index + len]);
        self.index += len;
        len
    }

    /// Skips at most `n` bytes, returning the number actually skipped.
    /// The cursor never moves past the end of the buffer.
    pub fn skip(&mut self, n: usize) -> usize {
        let len = n.min(self.available());
        self.index += len;
        len
    }
}

impl Read for ByteBufferReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = buf.len();
        Ok(self.read_into(buf, 0, len))
    }
}
