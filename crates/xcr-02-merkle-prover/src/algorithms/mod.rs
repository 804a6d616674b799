//! Merkle algorithms.

pub mod prover;
pub mod tree;

pub use prover::{
    compute_root, encode_proof, hash_children, hash_leaf, parse_proof, verify, Position,
    ProofNode, PATH_ENTRY_LEN,
};
pub use tree::MerkleTree;
