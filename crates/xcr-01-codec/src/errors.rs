//! # Codec Errors
//!
//! Every decode failure is a hard failure of the whole operation. Nothing in
//! this crate returns a partially populated value.

use shared_types::PrimitiveError;
use thiserror::Error;

/// Errors raised while encoding or decoding canonical byte streams.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer ended before a fixed-size read could complete.
    #[error("Buffer too short at offset {offset}: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Offset of the failed read.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A var-bytes length prefix declares more bytes than the buffer holds.
    #[error("Declared length {declared} exceeds remaining {remaining} bytes")]
    LengthOverflow {
        /// Length from the varint prefix.
        declared: u64,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A varint used a wider tag than its value requires.
    #[error("Non-canonical varint: tag 0x{tag:02x} carrying {value}")]
    NonCanonicalVarInt {
        /// Tag byte read.
        tag: u8,
        /// Decoded value.
        value: u64,
    },

    /// A value does not fit in its fixed-width slot.
    #[error("Value {value} does not fit in {width} bytes")]
    ValueTooLarge {
        /// Slot width in bytes.
        width: usize,
        /// Offending value.
        value: u64,
    },

    /// A fixed-width field failed primitive validation (sign bit, width).
    #[error("Invalid {field}: {source}")]
    InvalidField {
        /// Field being decoded.
        field: &'static str,
        /// Underlying primitive error.
        #[source]
        source: PrimitiveError,
    },

    /// Bytes remained after a structure that must consume the whole buffer.
    #[error("{count} trailing bytes after {structure}")]
    TrailingBytes {
        /// Structure that was decoded.
        structure: &'static str,
        /// Unconsumed byte count.
        count: usize,
    },
}
