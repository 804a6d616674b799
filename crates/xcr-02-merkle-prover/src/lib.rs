//! # XCR-02 Merkle Prover
//!
//! Proves that a leaf value is committed under a Merkle root carried by a
//! verified header.
//!
//! **Subsystem ID:** 02
//! **Status:** Production-Ready
//!
//! ## Hashing
//!
//! Leaves and internal nodes are domain separated so an internal node can
//! never be presented as a leaf:
//!
//! | Node     | Hash                              |
//! |----------|-----------------------------------|
//! | Leaf     | `SHA256(0x00 ‖ value)`            |
//! | Internal | `SHA256(0x01 ‖ left ‖ right)`     |
//!
//! ## Module Structure
//!
//! ```text
//! xcr-02-merkle-prover/
//! ├── algorithms/
//! │   ├── prover.rs  # Proof parsing and verification
//! │   └── tree.rs    # RFC 6962 tree builder and proof emission
//! └── errors.rs      # MerkleError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod errors;

// Re-exports
pub use algorithms::{
    compute_root, encode_proof, hash_children, hash_leaf, parse_proof, verify, MerkleTree,
    Position, ProofNode, PATH_ENTRY_LEN,
};
pub use errors::MerkleError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
