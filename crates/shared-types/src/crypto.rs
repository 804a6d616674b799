//! # Hash Functions
//!
//! The three digests the remote chain uses for headers, leaves and keeper
//! commitments.

use crate::primitives::{Hash20, Hash32};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Hash32(hasher.finalize().into())
}

/// Double SHA-256. Header hashes and header commitments use this.
pub fn hash256(data: &[u8]) -> Hash32 {
    let first = sha256(data);
    sha256(first.as_bytes())
}

/// RIPEMD-160 over SHA-256. Keeper-set commitments use this.
pub fn hash160(data: &[u8]) -> Hash20 {
    let first = sha256(data);
    let mut hasher = Ripemd160::new();
    hasher.update(first.as_bytes());
    Hash20(hasher.finalize().into())
}
