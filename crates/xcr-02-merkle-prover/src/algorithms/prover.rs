//! # Merkle Proof Verification
//!
//! Inclusion proof verification against a committed root.
//!
//! # Proof Layout
//!
//! ```text
//! leafValue varbytes | (side u8, sibling 32)*   -- leaf to root
//! ```
//!
//! # Algorithm
//!
//! 1. `hash = SHA256(0x00 || leafValue)`
//! 2. For each pair:
//!    - side == 0, sibling is the left child: `hash = SHA256(0x01 || sibling || hash)`
//!    - otherwise, sibling is the right child: `hash = SHA256(0x01 || hash || sibling)`
//! 3. `hash` must equal the root exactly.
//!
//! # Time Complexity: O(depth)

use crate::errors::MerkleError;
use sha2::{Digest, Sha256};
use shared_types::Hash32;
use xcr_01_codec::Source;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Bytes per audit path entry.
pub const PATH_ENTRY_LEN: usize = 1 + 32;

/// Which side of the running hash a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Sibling is the left child.
    Left,
    /// Sibling is the right child.
    Right,
}

impl Position {
    /// Wire byte: `0` for left, `1` for right.
    pub fn as_byte(self) -> u8 {
        match self {
            Position::Left => 0,
            Position::Right => 1,
        }
    }

    /// Any non-zero byte reads as right.
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            Position::Left
        } else {
            Position::Right
        }
    }
}

/// One level of an audit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofNode {
    /// Where the sibling sits.
    pub position: Position,
    /// Sibling subtree hash.
    pub sibling: Hash32,
}

impl ProofNode {
    /// Sibling on the left.
    pub fn left(sibling: Hash32) -> Self {
        Self {
            position: Position::Left,
            sibling,
        }
    }

    /// Sibling on the right.
    pub fn right(sibling: Hash32) -> Self {
        Self {
            position: Position::Right,
            sibling,
        }
    }
}

/// Leaf hash with domain separation.
pub fn hash_leaf(value: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(value);
    Hash32(hasher.finalize().into())
}

/// Internal node hash with domain separation.
pub fn hash_children(left: &Hash32, right: &Hash32) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Hash32(hasher.finalize().into())
}

/// Split a serialized proof into its leaf value and audit path.
pub fn parse_proof(proof: &[u8]) -> Result<(&[u8], Vec<ProofNode>), MerkleError> {
    let mut source = Source::new(proof);
    let leaf = source.read_var_bytes()?;

    let trailing = source.remaining() % PATH_ENTRY_LEN;
    if trailing != 0 {
        return Err(MerkleError::TruncatedPath { trailing });
    }

    let mut path = Vec::with_capacity(source.remaining() / PATH_ENTRY_LEN);
    while !source.is_exhausted() {
        let position = Position::from_byte(source.read_u8()?);
        let sibling = source.read_hash32()?;
        path.push(ProofNode { position, sibling });
    }
    Ok((leaf, path))
}

/// Fold an audit path over a leaf value.
pub fn compute_root(leaf: &[u8], path: &[ProofNode]) -> Hash32 {
    path.iter().fold(hash_leaf(leaf), |current, node| match node.position {
        Position::Left => hash_children(&node.sibling, &current),
        Position::Right => hash_children(&current, &node.sibling),
    })
}

/// Verify `proof` against `root` and return the proven leaf value.
///
/// There is no partial success: any decode error or root mismatch fails the
/// whole verification.
pub fn verify(proof: &[u8], root: &Hash32) -> Result<Vec<u8>, MerkleError> {
    let (leaf, path) = parse_proof(proof)?;
    let computed = compute_root(leaf, &path);
    if computed != *root {
        return Err(MerkleError::RootMismatch {
            expected: *root,
            computed,
        });
    }
    Ok(leaf.to_vec())
}

/// Serialize a leaf value and audit path into the proof layout.
pub fn encode_proof(leaf: &[u8], path: &[ProofNode]) -> Vec<u8> {
    let mut sink = xcr_01_codec::Sink::with_capacity(leaf.len() + 9 + path.len() * PATH_ENTRY_LEN);
    sink.write_var_bytes(leaf);
    for node in path {
        sink.write_u8(node.position.as_byte());
        sink.write_hash32(&node.sibling);
    }
    sink.into_bytes()
}
