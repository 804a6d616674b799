//! # Merkle Tree Builder
//!
//! Builds the tree a relay chain commits under `crossStatesRoot` and
//! `blockRoot`, and emits proofs in the layout [`verify`](super::verify)
//! consumes.
//!
//! Splits follow RFC 6962: a range of `n > 1` leaves divides at the largest
//! power of two strictly below `n`. Unbalanced trees therefore never
//! duplicate a leaf.

use super::prover::{encode_proof, hash_children, hash_leaf, ProofNode};
use crate::errors::MerkleError;
use shared_types::Hash32;

/// Merkle tree over opaque leaf values.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    leaves: Vec<Vec<u8>>,
    leaf_hashes: Vec<Hash32>,
    root: Hash32,
}

impl MerkleTree {
    /// Build a tree. At least one leaf is required.
    pub fn new(leaves: Vec<Vec<u8>>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        let leaf_hashes: Vec<Hash32> = leaves.iter().map(|leaf| hash_leaf(leaf)).collect();
        let root = subtree_root(&leaf_hashes);
        Ok(Self {
            leaves,
            leaf_hashes,
            root,
        })
    }

    /// Root hash.
    pub fn root(&self) -> Hash32 {
        self.root
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Always false; construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Audit path for the leaf at `index`, ordered leaf to root.
    pub fn audit_path(&self, index: usize) -> Result<Vec<ProofNode>, MerkleError> {
        if index >= self.leaves.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                leaves: self.leaves.len(),
            });
        }
        let mut path = Vec::new();
        collect_path(&self.leaf_hashes, index, &mut path);
        Ok(path)
    }

    /// Serialized inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<Vec<u8>, MerkleError> {
        let path = self.audit_path(index)?;
        Ok(encode_proof(&self.leaves[index], &path))
    }
}

/// Largest power of two strictly less than `n` (`n >= 2`).
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k << 1 < n {
        k <<= 1;
    }
    k
}

fn subtree_root(hashes: &[Hash32]) -> Hash32 {
    if hashes.len() == 1 {
        return hashes[0];
    }
    let k = split_point(hashes.len());
    hash_children(&subtree_root(&hashes[..k]), &subtree_root(&hashes[k..]))
}

fn collect_path(hashes: &[Hash32], index: usize, path: &mut Vec<ProofNode>) {
    if hashes.len() == 1 {
        return;
    }
    let k = split_point(hashes.len());
    if index < k {
        collect_path(&hashes[..k], index, path);
        path.push(ProofNode::right(subtree_root(&hashes[k..])));
    } else {
        collect_path(&hashes[k..], index - k, path);
        path.push(ProofNode::left(subtree_root(&hashes[..k])));
    }
}
