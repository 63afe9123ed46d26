//! A positioned, bounds-checked reader over raw font data.
//!
//! All multi-byte values in an SFNT file are big-endian, so every numeric
//! read here goes through `from_be_bytes` regardless of the host.

use crate::{Error, Result};

/// Seconds between 1904-01-01 (the SFNT long-date epoch) and 1970-01-01.
const LONG_DATE_TO_UNIX: i64 = 2_082_844_800;

/// A cursor over an immutable byte slice.
///
/// Reads advance the cursor; reading past the end fails with
/// [`Error::Truncated`]. Sub-views created with [`view`](Reader::view) are
/// independent readers borrowing the same underlying data.
#[derive(Clone, Copy, Default)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader at the start of `data`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Reader { data, offset: 0 }
    }

    /// Returns the total length of the underlying data.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether the underlying data is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current cursor position.
    #[inline]
    pub fn tell(&self) -> usize {
        self.offset
    }

    /// Checks whether the cursor reached the end of the data.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Moves the cursor to an absolute position.
    ///
    /// A negative position counts from the end. The result is clamped to
    /// `0..=len`.
    #[inline]
    pub fn seek(&mut self, pos: isize) {
        let len = self.data.len() as isize;
        self.offset = (if pos < 0 { len + pos } else { pos }).clamp(0, len) as usize;
    }

    /// Advances the cursor by `n` bytes, clamped to the end of the data.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.data.len());
    }

    /// Returns an independent reader over `data[start..end]`.
    ///
    /// Both bounds are clamped to the data length.
    pub fn view(&self, start: usize, end: usize) -> Reader<'a> {
        let end = end.min(self.data.len());
        let start = start.min(end);
        Reader::new(&self.data[start..end])
    }

    /// Returns an independent reader over everything after the cursor.
    #[inline]
    pub fn tail(&self) -> Reader<'a> {
        self.view(self.offset, self.data.len())
    }

    /// Returns a zero-copy view of the next `n` bytes and advances past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.offset.checked_add(n).ok_or(Error::Truncated)?;
        let bytes = self.data.get(self.offset..end).ok_or(Error::Truncated)?;
        self.offset = end;
        Ok(bytes)
    }

    #[inline]
    fn read_chunk<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read(N)?;
        let mut chunk = [0; N];
        chunk.copy_from_slice(bytes);
        Ok(chunk)
    }

    /// Reads a `u8`.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(u8::from_be_bytes(self.read_chunk()?))
    }

    /// Reads an `i8`.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a big-endian `u16`.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a big-endian `i16`.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a big-endian `u32`.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a big-endian `i32`.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a big-endian `u64`.
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a big-endian `i64`.
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_chunk()?))
    }

    /// Reads a 16.16 signed fixed-point number.
    #[inline]
    pub fn read_fixed(&mut self) -> Result<f32> {
        Ok(self.read_i32()? as f32 / 65536.0)
    }

    /// Reads a 2.14 signed fixed-point number.
    #[inline]
    pub fn read_f2dot14(&mut self) -> Result<f32> {
        Ok(f32::from(self.read_i16()?) / 16384.0)
    }

    /// Reads an SFNT long date and converts it to a Unix timestamp.
    #[inline]
    pub fn read_long_date(&mut self) -> Result<i64> {
        Ok(self.read_i64()?.wrapping_sub(LONG_DATE_TO_UNIX))
    }

    /// Reads `n` bytes as a UTF-8 string, replacing invalid sequences.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        Ok(String::from_utf8_lossy(self.read(n)?).into_owned())
    }
}

impl core::fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reader(pos={}, len={})", self.offset, self.data.len())
    }
}
