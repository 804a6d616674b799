//! # Binary Codec
//!
//! Canonical variable-length and fixed-width encodings shared by every wire
//! structure in the relay.
//!
//! ## Varint Layout
//!
//! | Value range | Encoding |
//! |-------------|----------|
//! | `< 0xFD` | 1 byte, the value itself |
//! | `<= 0xFFFF` | `0xFD` + u16 LE |
//! | `<= 0xFFFF_FFFF` | `0xFE` + u32 LE |
//! | otherwise | `0xFF` + u64 LE |
//!
//! The decoder enforces the same minimal ranges, so every value has exactly
//! one accepted encoding.

use crate::errors::CodecError;
use shared_types::{Hash20, Hash32, LeUint};

const TAG_U16: u8 = 0xFD;
const TAG_U32: u8 = 0xFE;
const TAG_U64: u8 = 0xFF;

/// Append-only encoder.
#[derive(Debug, Default, Clone)]
pub struct Sink {
    buf: Vec<u8>,
}

impl Sink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty sink with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Raw bytes, no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Fixed 2-byte LE. Rejects values above `0xFFFF`.
    pub fn write_uint16(&mut self, value: u64) -> Result<(), CodecError> {
        let narrowed =
            u16::try_from(value).map_err(|_| CodecError::ValueTooLarge { width: 2, value })?;
        self.buf.extend_from_slice(&narrowed.to_le_bytes());
        Ok(())
    }

    /// Fixed 4-byte LE.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Fixed 8-byte LE.
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Minimal varint.
    pub fn write_var_int(&mut self, value: u64) {
        if value < TAG_U16 as u64 {
            self.buf.push(value as u8);
        } else if value <= u16::MAX as u64 {
            self.buf.push(TAG_U16);
            self.buf.extend_from_slice(&(value as u16).to_le_bytes());
        } else if value <= u32::MAX as u64 {
            self.buf.push(TAG_U32);
            self.buf.extend_from_slice(&(value as u32).to_le_bytes());
        } else {
            self.buf.push(TAG_U64);
            self.buf.extend_from_slice(&value.to_le_bytes());
        }
    }

    /// Varint length prefix followed by the bytes.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_int(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// 32-byte hash, as-is.
    pub fn write_hash32(&mut self, hash: &Hash32) {
        self.buf.extend_from_slice(hash.as_bytes());
    }

    /// 20-byte hash, as-is.
    pub fn write_hash20(&mut self, hash: &Hash20) {
        self.buf.extend_from_slice(hash.as_bytes());
    }

    /// Fixed-width LE unsigned value.
    pub fn write_le_uint<const N: usize>(&mut self, value: &LeUint<N>) {
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the sink.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a borrowed buffer. Every read either advances past the whole
/// field or fails without moving.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Source<'a> {
    /// Cursor at offset 0.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Cursor at an explicit offset.
    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, offset }
    }

    /// Current read offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    /// Whether the whole buffer has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        let start = self.offset;
        let field = start
            .checked_add(count)
            .and_then(|end| self.buf.get(start..end))
            .ok_or(CodecError::UnexpectedEof {
                offset: start,
                needed: count,
                remaining: self.remaining(),
            })?;
        self.offset += count;
        Ok(field)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Fixed 2-byte LE.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Fixed 4-byte LE.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Fixed 8-byte LE.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Minimal varint. Wider-than-needed tags are rejected.
    pub fn read_var_int(&mut self) -> Result<u64, CodecError> {
        let start = self.offset;
        let result = self.read_var_int_inner();
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    fn read_var_int_inner(&mut self) -> Result<u64, CodecError> {
        let tag = self.read_u8()?;
        let (value, min) = match tag {
            TAG_U16 => (self.read_u16()? as u64, TAG_U16 as u64),
            TAG_U32 => (self.read_u32()? as u64, u16::MAX as u64 + 1),
            TAG_U64 => (self.read_u64()?, u32::MAX as u64 + 1),
            small => return Ok(small as u64),
        };
        if value < min {
            return Err(CodecError::NonCanonicalVarInt { tag, value });
        }
        Ok(value)
    }

    /// Varint length prefix followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let start = self.offset;
        let declared = self.read_var_int()?;
        let remaining = self.remaining();
        let len = match usize::try_from(declared) {
            Ok(len) if len <= remaining => len,
            _ => {
                self.offset = start;
                return Err(CodecError::LengthOverflow {
                    declared,
                    remaining,
                });
            }
        };
        self.read_bytes(len)
    }

    /// 32-byte hash.
    pub fn read_hash32(&mut self) -> Result<Hash32, CodecError> {
        Ok(Hash32(self.read_array()?))
    }

    /// 20-byte hash.
    pub fn read_hash20(&mut self) -> Result<Hash20, CodecError> {
        Ok(Hash20(self.read_array()?))
    }

    /// Fixed-width LE unsigned value; sign bit must be clear.
    pub fn read_le_uint<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<LeUint<N>, CodecError> {
        let start = self.offset;
        let raw = self.read_bytes(N)?;
        LeUint::from_le_slice(raw).map_err(|source| {
            self.offset = start;
            CodecError::InvalidField { field, source }
        })
    }
}

/// Encode `value` as a standalone varint.
pub fn write_var_int(value: u64) -> Vec<u8> {
    let mut sink = Sink::with_capacity(9);
    sink.write_var_int(value);
    sink.into_bytes()
}

/// Encode `bytes` with a varint length prefix.
pub fn write_var_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut sink = Sink::with_capacity(bytes.len() + 9);
    sink.write_var_bytes(bytes);
    sink.into_bytes()
}

/// Read a varint at `offset`; returns the value and the offset after it.
pub fn read_var_int(buf: &[u8], offset: usize) -> Result<(u64, usize), CodecError> {
    let mut source = Source::at(buf, offset);
    let value = source.read_var_int()?;
    Ok((value, source.offset()))
}

/// Read var-bytes at `offset`; returns the slice and the offset after it.
pub fn read_var_bytes(buf: &[u8], offset: usize) -> Result<(&[u8], usize), CodecError> {
    let mut source = Source::at(buf, offset);
    let bytes = source.read_var_bytes()?;
    Ok((bytes, source.offset()))
}
