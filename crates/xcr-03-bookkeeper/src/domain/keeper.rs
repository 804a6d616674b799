//! # Keeper Sets
//!
//! Keepers arrive as 67-byte records: a 2-byte legacy key-type prefix, then
//! an uncompressed SEC1 point (`04 ‖ X ‖ Y`).
//!
//! ## Commitment
//!
//! ```text
//! nextBookKeeper = hash160(u16le(n) ‖ varbytes(compressed_0) ‖ … ‖ u16le(m))
//! ```
//!
//! where `compressed_i` keeps the legacy prefix (35 bytes) and
//! `m = n - (n - 1) / 3`.

use super::errors::BookKeeperError;
use k256::ecdsa::VerifyingKey;
use shared_types::{hash160, Hash20};
use xcr_01_codec::Sink;

/// Width of one raw keeper record.
pub const KEEPER_RECORD_LEN: usize = 67;

/// Width of a compressed key with its legacy prefix retained.
pub const COMPRESSED_RECORD_LEN: usize = 35;

const LEGACY_PREFIX_LEN: usize = 2;

/// Minimum number of in-order signatures required from `n` keepers.
///
/// Tolerates `f = (n - 1) / 3` faulty keepers.
pub fn quorum(n: usize) -> usize {
    n - n.saturating_sub(1) / 3
}

/// Compress one raw keeper record, keeping its legacy prefix.
///
/// Byte 2 becomes `0x02` or `0x03` according to the parity of the last Y
/// byte; the Y coordinate is dropped.
pub fn compress_keeper_key(record: &[u8]) -> Result<[u8; COMPRESSED_RECORD_LEN], BookKeeperError> {
    if record.len() != KEEPER_RECORD_LEN {
        return Err(BookKeeperError::InvalidKeyList {
            len: record.len(),
            record: KEEPER_RECORD_LEN,
        });
    }
    let mut compressed = [0u8; COMPRESSED_RECORD_LEN];
    compressed.copy_from_slice(&record[..COMPRESSED_RECORD_LEN]);
    compressed[LEGACY_PREFIX_LEN] = if record[KEEPER_RECORD_LEN - 1] % 2 == 0 {
        0x02
    } else {
        0x03
    };
    Ok(compressed)
}

/// An authoritative keeper set and its commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookKeeper {
    /// `hash160` commitment the activating header must carry.
    pub next_book_keeper: Hash20,
    /// Keepers in signing order.
    pub keepers: Vec<VerifyingKey>,
}

impl BookKeeper {
    /// Number of keepers.
    pub fn len(&self) -> usize {
        self.keepers.len()
    }

    /// Whether the set holds no keepers.
    pub fn is_empty(&self) -> bool {
        self.keepers.is_empty()
    }

    /// Required in-order signatures.
    pub fn quorum(&self) -> usize {
        quorum(self.keepers.len())
    }

    /// Keepers as 33-byte compressed SEC1 points.
    pub fn compressed_keys(&self) -> Vec<Vec<u8>> {
        self.keepers
            .iter()
            .map(|key| key.to_encoded_point(true).as_bytes().to_vec())
            .collect()
    }
}

/// Parse a raw key list and compute its commitment.
pub fn derive_book_keeper(raw_keys: &[u8]) -> Result<BookKeeper, BookKeeperError> {
    if raw_keys.is_empty() {
        return Err(BookKeeperError::EmptyKeyList);
    }
    if raw_keys.len() % KEEPER_RECORD_LEN != 0 {
        return Err(BookKeeperError::InvalidKeyList {
            len: raw_keys.len(),
            record: KEEPER_RECORD_LEN,
        });
    }

    let n = raw_keys.len() / KEEPER_RECORD_LEN;
    if n > u16::MAX as usize {
        return Err(BookKeeperError::TooManyKeepers { count: n });
    }

    let mut commitment = Sink::with_capacity(4 + n * (COMPRESSED_RECORD_LEN + 1));
    commitment.write_uint16(n as u64)?;

    let mut keepers = Vec::with_capacity(n);
    for (index, record) in raw_keys.chunks_exact(KEEPER_RECORD_LEN).enumerate() {
        let compressed = compress_keeper_key(record)?;
        let key = VerifyingKey::from_sec1_bytes(&compressed[LEGACY_PREFIX_LEN..])
            .map_err(|_| BookKeeperError::InvalidKey { index })?;
        commitment.write_var_bytes(&compressed);
        keepers.push(key);
    }
    commitment.write_uint16(quorum(n) as u64)?;

    Ok(BookKeeper {
        next_book_keeper: hash160(&commitment.into_bytes()),
        keepers,
    })
}
