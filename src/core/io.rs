//! Slice-backed stream reading.

use std::error;
use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// An ergonomics layer around a byte slice.
///
/// This is meant to automate bounds checking and data transformation when parsing tags.
/// The codec never owns its input, so every stream borrows the buffer it was created from.
#[derive(Clone)]
pub struct BufStream<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> BufStream<'a> {
    /// Construct a new `BufStream` from `src`.
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Reads this stream into a buffer.
    ///
    /// If the end of the stream is reached, then the remaining bytes will be unchanged.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let len = usize::min(self.remaining(), buf.len());
        buf[..len].copy_from_slice(&self.src[self.pos..self.pos + len]);
        self.pos += len;
        len
    }

    /// Reads this stream into a buffer.
    ///
    /// # Errors
    /// If the buffer cannot be filled, then an error will be returned.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        if self.remaining() < buf.len() {
            return Err(StreamError::BufferUnderread {
                len: buf.len(),
                remaining: self.remaining(),
            });
        }

        buf.copy_from_slice(&self.src[self.pos..self.pos + buf.len()]);
        self.pos += buf.len();

        Ok(())
    }

    /// Reads this stream into an array of size `N`.
    ///
    /// # Errors
    /// If the array cannot be filled, then an error is returned.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut arr = [0; N];
        self.read_exact(&mut arr)?;
        Ok(arr)
    }

    /// Reads exactly one [`u8`](u8) from this stream.
    ///
    /// # Errors
    /// If the stream is exhausted, then an error will be returned.
    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        if self.is_empty() {
            return Err(StreamError::EndOfStream);
        }

        self.pos += 1;

        Ok(self.src[self.pos - 1])
    }

    /// Reads a big-endian [`u16`](u16) from this stream.
    ///
    /// # Errors
    /// If there are not enough bytes to construct the type, then an error is returned.
    pub fn read_be_u16(&mut self) -> Result<u16, StreamError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian [`u32`](u32) from this stream.
    ///
    /// # Errors
    /// If there are not enough bytes to construct the type, then an error is returned.
    pub fn read_be_u32(&mut self) -> Result<u32, StreamError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian [`i16`](i16) from this stream.
    ///
    /// # Errors
    /// If there are not enough bytes to construct the type, then an error is returned.
    pub fn read_be_i16(&mut self) -> Result<i16, StreamError> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian [`i32`](i32) from this stream.
    ///
    /// # Errors
    /// If there are not enough bytes to construct the type, then an error is returned.
    pub fn read_be_i32(&mut self) -> Result<i32, StreamError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Reads a 24-bit big-endian unsigned integer from this stream.
    ///
    /// # Errors
    /// If there are not enough bytes to construct the type, then an error is returned.
    pub fn read_be_u24(&mut self) -> Result<u32, StreamError> {
        let raw: [u8; 3] = self.read_array()?;
        Ok(u32::from_be_bytes([0, raw[0], raw[1], raw[2]]))
    }

    /// Reads a big-endian unsigned integer of `width` bytes.
    ///
    /// # Panics
    /// Panics if `width` is greater than 4.
    ///
    /// # Errors
    /// If there are not enough bytes to construct the value, then an error is returned.
    pub fn read_uint(&mut self, width: usize) -> Result<u32, StreamError> {
        let mut arr = [0; 4];
        self.read_exact(&mut arr[4 - width..])?;
        Ok(u32::from_be_bytes(arr))
    }

    /// Skips `n` bytes in this stream.
    ///
    /// # Errors
    /// If this skip is beyond the stream length, then an error will be returned.
    pub fn skip(&mut self, n: usize) -> Result<(), StreamError> {
        if self.remaining() < n {
            return Err(StreamError::OutOfBounds {
                pos: self.pos + n,
                len: self.len(),
            });
        }

        self.pos += n;

        Ok(())
    }

    /// Consumes the stream and returns a slice of size `n`.
    ///
    /// # Errors
    /// If the slice bounds are outside of the range of the stream, then an error is returned.
    pub fn slice(&mut self, n: usize) -> Result<&'a [u8], StreamError> {
        if self.remaining() < n {
            return Err(StreamError::BufferUnderread {
                len: n,
                remaining: self.remaining(),
            });
        }

        self.pos += n;

        Ok(&self.src[self.pos - n..self.pos])
    }

    /// Like [`slice`](BufStream::slice), but it returns a new `BufStream` containing the slice.
    ///
    /// # Errors
    /// If the slice bounds are outside of the range of the stream, then an error is returned.
    pub fn slice_stream(&mut self, n: usize) -> Result<BufStream<'a>, StreamError> {
        Ok(BufStream::new(self.slice(n)?))
    }

    /// Peeks at a portion of this stream relative to the current position, without consuming
    /// the stream.
    ///
    /// # Errors
    /// If the peek location is out of bounds, an error will be returned.
    pub fn peek(&self, range: Range<usize>) -> Result<&[u8], StreamError> {
        let start = range.start + self.pos;
        let end = range.end + self.pos;

        if start > self.len() || end > self.len() {
            return Err(StreamError::OutOfBounds {
                pos: end,
                len: self.len(),
            });
        }

        Ok(&self.src[start..end])
    }

    /// Searches for `needle` and returns a slice of the data including the pattern.
    ///
    /// This function will consume the stream until the stream is exhausted or if the
    /// pattern has been found. It will then return all of the data it consumed while
    /// searching. The search steps by the needle length, so a two-byte terminator will
    /// only ever match on a code-unit boundary.
    pub fn search(&mut self, needle: &[u8]) -> &'a [u8] {
        let start = self.pos;
        let limit = self.pos + self.remaining();

        let mut begin = self.pos;
        let mut end = self.pos + needle.len();

        while end <= limit {
            if &self.src[begin..end] == needle {
                self.pos = end;

                return &self.src[start..self.pos];
            }

            begin += needle.len();
            end += needle.len();
        }

        self.take_rest()
    }

    /// Consumes the rest of the stream into a slice, exhausting the stream.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.src[self.pos..];
        self.pos += self.remaining();
        rest
    }

    /// Returns the length of this stream.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Returns the remaining length of this stream.
    pub fn remaining(&self) -> usize {
        self.len() - self.pos
    }

    /// Returns if this stream is exhausted.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// The error type returned when a [`BufStream`](BufStream) read fails.
#[derive(Debug, Clone)]
pub enum StreamError {
    /// The stream was exhausted.
    EndOfStream,
    /// The buffer was left unread.
    BufferUnderread { len: usize, remaining: usize },
    /// A position beyond the stream was requested.
    OutOfBounds { pos: usize, len: usize },
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            StreamError::EndOfStream => write![f, "end of stream"],
            StreamError::BufferUnderread { len, remaining } => write![
                f,
                "buffer underread: length is {} but stream only has {}",
                len, remaining
            ],
            StreamError::OutOfBounds { pos, len } => {
                write![f, "out of bounds: index is {} but length is {}", pos, len]
            }
        }
    }
}

impl error::Error for StreamError {
    // Nothing to implement
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_primitives() {
        let mut stream = BufStream::new(b"\x16\xAB\xCD\x00\x01\xE2\x40\xFF\xFF");

        assert_eq!(stream.read_u8().unwrap(), 0x16);
        assert_eq!(stream.read_be_u16().unwrap(), 0xABCD);
        assert_eq!(stream.read_be_u24().unwrap(), 0x0001E2);
        assert_eq!(stream.read_be_i16().unwrap(), 0x40FF);
        assert_eq!(stream.read_u8().unwrap(), 0xFF);
        assert!(stream.read_u8().is_err());
    }

    #[test]
    fn slice_bounds() {
        let mut stream = BufStream::new(b"abcdef");

        assert_eq!(stream.slice(2).unwrap(), b"ab");
        assert_eq!(stream.peek(0..2).unwrap(), b"cd");
        assert!(stream.slice(5).is_err());
        assert_eq!(stream.take_rest(), b"cdef");
        assert!(stream.is_empty());
    }

    #[test]
    fn search_steps_by_needle() {
        // A one-byte window would stop at the lone NUL at index 5, but a two-byte
        // search has to remain aligned to the code unit boundary.
        let mut stream = BufStream::new(b"\x41\x00\x42\x00\x43\x00\x00\x00\x44\x00");

        assert_eq!(stream.search(&[0, 0]), b"\x41\x00\x42\x00\x43\x00\x00\x00");
        assert_eq!(stream.take_rest(), b"\x44\x00");
    }
}
