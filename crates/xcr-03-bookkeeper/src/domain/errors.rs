//! # BookKeeper Errors
//!
//! Error types for keeper-set derivation, genesis and rotation.

use shared_types::Hash20;
use thiserror::Error;
use xcr_01_codec::CodecError;

/// Errors raised while deriving, bootstrapping or rotating a keeper set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookKeeperError {
    /// Raw header or key list could not be decoded
    #[error("Malformed input: {0}")]
    Codec(#[from] CodecError),

    /// Raw key list is not a whole number of 67-byte records
    #[error("Key list length {len} is not a multiple of {record}")]
    InvalidKeyList {
        /// Actual length in bytes.
        len: usize,
        /// Record width in bytes.
        record: usize,
    },

    /// Raw key list holds no keys
    #[error("Key list is empty")]
    EmptyKeyList,

    /// Key count does not fit the u16 commitment field
    #[error("Too many keepers: {count}")]
    TooManyKeepers {
        /// Number of records supplied.
        count: usize,
    },

    /// A record is not a valid secp256k1 point
    #[error("Keeper key {index} is not a valid secp256k1 point")]
    InvalidKey {
        /// Position in the key list.
        index: usize,
    },

    /// Genesis has already been performed
    #[error("Genesis already performed")]
    AlreadyGenesised,

    /// Rotation attempted before genesis
    #[error("Genesis has not been performed")]
    NotGenesised,

    /// Genesis header must be at height 0
    #[error("Genesis header height must be 0, got {height}")]
    GenesisHeight {
        /// Height carried by the offered header.
        height: u32,
    },

    /// Rotation header does not advance the epoch
    #[error("Header height {height} does not advance epoch height {current}")]
    HeightRegression {
        /// Height carried by the offered header.
        height: u32,
        /// Current epoch height.
        current: u32,
    },

    /// Derived keeper commitment differs from the header's `nextBookKeeper`
    #[error("nextBookKeeper mismatch: header {expected}, derived {derived}")]
    KeeperHashMismatch {
        /// Commitment carried by the header.
        expected: Hash20,
        /// Commitment derived from the offered keys.
        derived: Hash20,
    },

    /// Fewer than `required` keepers signed in order
    #[error("Threshold signature check failed: {required} of {keepers} required")]
    QuorumNotMet {
        /// Quorum size.
        required: usize,
        /// Keeper count.
        keepers: usize,
    },

    /// Persisted epoch state could not be read back
    #[error("Corrupt epoch state: {0}")]
    CorruptState(String),

    /// Epoch store failure
    #[error("Epoch store error: {0}")]
    Storage(String),
}
