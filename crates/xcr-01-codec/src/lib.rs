//! # XCR-01 Canonical Codec
//!
//! Byte-exact encodings for everything that crosses the relay trust boundary.
//!
//! **Subsystem ID:** 01
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Headers and proofs are produced by the remote chain and arrive as opaque
//! buffers. The decoders here must agree byte-for-byte with the remote chain's
//! own encoder. They also must never return a partially populated value.
//!
//! ## Module Structure
//!
//! ```text
//! xcr-01-codec/
//! ├── binary.rs    # Varint, var-bytes and fixed-width Sink/Source
//! ├── header.rs    # Remote block header
//! ├── envelope.rs  # CrossChainTxParameter, ToMerkleValue
//! └── errors.rs    # CodecError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binary;
pub mod envelope;
pub mod errors;
pub mod header;

// Re-exports
pub use binary::{read_var_bytes, read_var_int, write_var_bytes, write_var_int, Sink, Source};
pub use envelope::{
    decode_inbound, decode_outbound, encode_outbound, CrossChainTxParameter, ToMerkleValue,
};
pub use errors::CodecError;
pub use header::{header_hash, Header};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
