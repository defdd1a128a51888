//! Primitive codec
//!
//! Fixed-width building blocks for the record formats. Every multi-byte
//! integer is big-endian and `f32` values are written as their IEEE-754 bit
//! pattern, also big-endian. Decoding walks a borrowed buffer with a cursor
//! so nested records never copy their input.

use crate::error::CodecError;

/// Width of a repeated-group count prefix
pub const COUNT_LEN: usize = 2;

/// Largest number of records a repeated group can hold
pub const MAX_COUNT: usize = u16::MAX as usize;

/// Cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf, pos: 0 }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads exactly `n` bytes, advancing the cursor
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(CodecError::TruncatedInput {
                needed: n,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    /// Reads a count prefix and checks that `count` records of at least
    /// `min_width` bytes can still fit in the buffer.
    ///
    /// Nothing is allocated for the group before this succeeds.
    pub fn read_count(&mut self, min_width: usize) -> Result<usize, CodecError> {
        let count = self.read_u16()? as usize;
        let needed = count
            .checked_mul(min_width)
            .ok_or(CodecError::CountOverflow {
                count,
                width: min_width,
            })?;
        let remaining = self.remaining();
        if needed > remaining {
            return Err(CodecError::TruncatedInput { needed, remaining });
        }
        Ok(count)
    }
}

pub fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn put_i64(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn put_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Writes the count prefix of a repeated group.
///
/// Callers guarantee `count <= MAX_COUNT` through `check_count` at
/// construction time.
pub fn put_count(out: &mut Vec<u8>, count: usize) {
    debug_assert!(count <= MAX_COUNT);
    put_u16(out, count as u16);
}

/// Rejects repeated groups that do not fit in a 16-bit count
pub fn check_count(count: usize, width: usize) -> Result<(), CodecError> {
    if count > MAX_COUNT {
        return Err(CodecError::CountOverflow { count, width });
    }
    Ok(())
}

/// Types with a canonical binary encoding.
pub trait Encode {
    /// Exact number of bytes `encode_into` writes
    fn encoded_len(&self) -> usize;

    fn encode_into(&self, out: &mut Vec<u8>);

    /// Materialises the whole record into a buffer of exact capacity
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }
}

/// Types that can be read back from their canonical encoding.
pub trait Decode: Sized {
    /// Reads one record at the cursor
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError>;

    /// Decodes one record from the front of `bytes`, returning it with the
    /// number of bytes it occupied.
    fn decode_prefix(bytes: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut reader = Reader::new(bytes);
        let value = Self::decode_from(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Decodes exactly one record; leftover bytes are `TrailingData`.
    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(bytes);
        let value = Self::decode_from(&mut reader)?;
        if !reader.is_empty() {
            return Err(CodecError::TrailingData {
                remaining: reader.remaining(),
            });
        }
        Ok(value)
    }
}

/// Decodes back-to-back records until the buffer is exhausted.
pub fn decode_stream<T: Decode>(bytes: &[u8]) -> Result<Vec<T>, CodecError> {
    let mut reader = Reader::new(bytes);
    let mut items = Vec::new();
    while !reader.is_empty() {
        items.push(T::decode_from(&mut reader)?);
    }
    Ok(items)
}

/// Decodes a count-prefixed group of `T`, each at least `min_width` bytes long
pub fn read_group<T: Decode>(
    reader: &mut Reader<'_>,
    min_width: usize,
) -> Result<Vec<T>, CodecError> {
    let count = reader.read_count(min_width)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::decode_from(reader)?);
    }
    Ok(items)
}

/// Writes a count-prefixed group
pub fn write_group<T: Encode>(out: &mut Vec<u8>, items: &[T]) {
    put_count(out, items.len());
    for item in items {
        item.encode_into(out);
    }
}
