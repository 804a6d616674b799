//! # Fixed-Width Little-Endian Unsigned Integers
//!
//! Chain ids and amounts travel as fixed-length little-endian byte strings,
//! right-zero-padded to their declared width. The remote chain reads them as
//! two's-complement, so a set top bit would decode as a negative number.
//! `LeUint` refuses such values on every construction path.

use crate::errors::PrimitiveError;
use std::fmt;

/// An unsigned integer stored as exactly `N` little-endian bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeUint<const N: usize>([u8; N]);

/// 8-byte chain identifier as it appears in envelopes.
pub type ChainId = LeUint<8>;

impl<const N: usize> LeUint<N> {
    /// Width in bytes.
    pub const WIDTH: usize = N;

    fn from_array(bytes: [u8; N]) -> Result<Self, PrimitiveError> {
        if N > 0 && bytes[N - 1] & 0x80 != 0 {
            return Err(PrimitiveError::SignBitSet { width: N });
        }
        Ok(Self(bytes))
    }

    /// Encode `value`, failing if it does not fit in `N` bytes without
    /// touching the sign bit.
    pub fn from_u64(value: u64) -> Result<Self, PrimitiveError> {
        let mut out = [0u8; N];
        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            if i < N {
                out[i] = *byte;
            } else if *byte != 0 {
                return Err(PrimitiveError::Overflow { width: N });
            }
        }
        Self::from_array(out)
    }

    /// Decode from exactly `N` little-endian bytes.
    pub fn from_le_slice(bytes: &[u8]) -> Result<Self, PrimitiveError> {
        let array: [u8; N] = bytes
            .try_into()
            .map_err(|_| PrimitiveError::InvalidLength {
                expected: N,
                actual: bytes.len(),
            })?;
        Self::from_array(array)
    }

    /// Decode from a minimal little-endian encoding shorter than `N`,
    /// right-padding with zeros.
    pub fn from_le_padded(bytes: &[u8]) -> Result<Self, PrimitiveError> {
        let padded = pad_right(bytes, N)?;
        Self::from_le_slice(&padded)
    }

    /// Numeric value. Fails only for widths above 8 bytes holding large values.
    pub fn to_u64(&self) -> Result<u64, PrimitiveError> {
        let mut out = [0u8; 8];
        for (i, byte) in self.0.iter().enumerate() {
            if i < 8 {
                out[i] = *byte;
            } else if *byte != 0 {
                return Err(PrimitiveError::Overflow { width: 8 });
            }
        }
        Ok(u64::from_le_bytes(out))
    }

    /// Raw little-endian bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for LeUint<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Debug for LeUint<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u64() {
            Ok(v) => write!(f, "LeUint<{}>({})", N, v),
            Err(_) => write!(f, "LeUint<{}>(0x{})", N, hex::encode(self.0)),
        }
    }
}

impl<const N: usize> fmt::Display for LeUint<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u64() {
            Ok(v) => write!(f, "{}", v),
            Err(_) => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

/// Right-pad `value` with zero bytes up to `width`.
pub fn pad_right(value: &[u8], width: usize) -> Result<Vec<u8>, PrimitiveError> {
    if value.len() > width {
        return Err(PrimitiveError::Overflow { width });
    }
    let mut out = Vec::with_capacity(width);
    out.extend_from_slice(value);
    out.resize(width, 0);
    Ok(out)
}
