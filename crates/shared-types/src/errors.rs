//! # Primitive Errors

use thiserror::Error;

/// Errors raised while constructing fixed-width primitives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Input slice does not have the exact width of the target type.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required width in bytes.
        expected: usize,
        /// Width actually supplied.
        actual: usize,
    },

    /// Value does not fit in the declared width.
    #[error("Value overflows {width}-byte field")]
    Overflow {
        /// Declared width in bytes.
        width: usize,
    },

    /// Most significant bit is set; the remote chain would read this as negative.
    #[error("Sign bit set in {width}-byte unsigned field")]
    SignBitSet {
        /// Declared width in bytes.
        width: usize,
    },
}
