//! # Merkle Errors

use shared_types::Hash32;
use thiserror::Error;
use xcr_01_codec::CodecError;

/// Merkle proof error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MerkleError {
    /// Leaf value prefix could not be decoded.
    #[error("Malformed proof: {0}")]
    Codec(#[from] CodecError),

    /// Audit path does not split into whole `(side, sibling)` pairs.
    #[error("Malformed proof: {trailing} trailing bytes after audit path")]
    TruncatedPath {
        /// Bytes left over after the last complete pair.
        trailing: usize,
    },

    /// Recomputed root differs from the committed root.
    #[error("Merkle root mismatch: expected {expected}, computed {computed}")]
    RootMismatch {
        /// Root the proof was checked against.
        expected: Hash32,
        /// Root the proof actually produced.
        computed: Hash32,
    },

    /// Tree construction over zero leaves.
    #[error("Cannot build a Merkle tree over zero leaves")]
    EmptyTree,

    /// Proof requested for a leaf index outside the tree.
    #[error("Leaf index {index} out of range for {leaves} leaves")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        leaves: usize,
    },
}
