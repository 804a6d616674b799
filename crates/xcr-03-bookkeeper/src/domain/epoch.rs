//! # Epoch State
//!
//! The single authoritative keeper set and the height it was activated at.

use super::errors::BookKeeperError;
use super::keeper::BookKeeper;
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};
use shared_types::Hash20;

/// Current epoch: activation height plus the keeper set.
///
/// Existence of an `EpochState` means genesis has been performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochState {
    /// Height of the header that activated this keeper set.
    pub height: u32,
    /// Authoritative keepers.
    pub book_keeper: BookKeeper,
}

impl EpochState {
    /// Keepers in signing order.
    pub fn keepers(&self) -> &[VerifyingKey] {
        &self.book_keeper.keepers
    }
}

/// Persisted form of a keeper set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperSetRecord {
    /// Commitment the set was activated under.
    pub next_book_keeper: Hash20,
    /// 33-byte compressed SEC1 points, in signing order.
    pub keys: Vec<Vec<u8>>,
}

impl KeeperSetRecord {
    /// Snapshot a keeper set.
    pub fn from_book_keeper(book_keeper: &BookKeeper) -> Self {
        Self {
            next_book_keeper: book_keeper.next_book_keeper,
            keys: book_keeper.compressed_keys(),
        }
    }

    /// Restore the keeper set, re-validating every point.
    pub fn into_book_keeper(self) -> Result<BookKeeper, BookKeeperError> {
        let keepers = self
            .keys
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                VerifyingKey::from_sec1_bytes(bytes).map_err(|_| {
                    BookKeeperError::CorruptState(format!("stored keeper {} is invalid", index))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BookKeeper {
            next_book_keeper: self.next_book_keeper,
            keepers,
        })
    }

    /// bincode encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BookKeeperError> {
        bincode::serialize(self).map_err(|e| BookKeeperError::CorruptState(e.to_string()))
    }

    /// Decode a bincode record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BookKeeperError> {
        bincode::deserialize(bytes).map_err(|e| BookKeeperError::CorruptState(e.to_string()))
    }
}

/// Height policy for rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationPolicy {
    /// Accept a rotation header at the current epoch height.
    pub allow_same_height: bool,
}

impl RotationPolicy {
    /// Whether a header at `height` may replace the epoch activated at `current`.
    pub fn admits(&self, height: u32, current: u32) -> bool {
        if self.allow_same_height {
            height >= current
        } else {
            height > current
        }
    }
}
