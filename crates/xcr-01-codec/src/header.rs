//! # Header Codec
//!
//! Remote-chain block header, decoded all-or-nothing from the relayer's raw
//! bytes.
//!
//! ## Wire Layout
//!
//! ```text
//! version u32 | chainId u64 | prevBlockHash 32 | transactionRoot 32
//! | crossStatesRoot 32 | blockRoot 32 | timestamp u32 | height u32
//! | consensusData u64 | consensusPayload varbytes | nextBookKeeper 20
//! ```
//!
//! Signatures and header commitments always cover the raw bytes, never a
//! re-encoding, so callers keep the original buffer alongside the decoded
//! value.

use crate::binary::{Sink, Source};
use crate::errors::CodecError;
use shared_types::{hash256, Hash20, Hash32};

/// Decoded remote-chain block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header format version.
    pub version: u32,
    /// Remote chain id.
    pub chain_id: u64,
    /// Parent header hash.
    pub prev_block_hash: Hash32,
    /// Transaction Merkle root.
    pub transaction_root: Hash32,
    /// Root committing cross-chain message leaves.
    pub cross_states_root: Hash32,
    /// Root committing historical header hashes.
    pub block_root: Hash32,
    /// Block timestamp (seconds).
    pub timestamp: u32,
    /// Block height.
    pub height: u32,
    /// Consensus nonce.
    pub consensus_data: u64,
    /// Opaque consensus payload.
    pub consensus_payload: Vec<u8>,
    /// Commitment to the keeper set that signs the next epoch.
    pub next_book_keeper: Hash20,
}

impl Header {
    /// Smallest possible encoding: every fixed field plus a zero-length payload.
    pub const MIN_ENCODED_LEN: usize = 4 + 8 + 32 * 4 + 4 + 4 + 8 + 1 + 20;

    /// Decode a header. Trailing bytes after `nextBookKeeper` are ignored.
    pub fn decode(raw: &[u8]) -> Result<Self, CodecError> {
        let mut source = Source::new(raw);
        Ok(Self {
            version: source.read_u32()?,
            chain_id: source.read_u64()?,
            prev_block_hash: source.read_hash32()?,
            transaction_root: source.read_hash32()?,
            cross_states_root: source.read_hash32()?,
            block_root: source.read_hash32()?,
            timestamp: source.read_u32()?,
            height: source.read_u32()?,
            consensus_data: source.read_u64()?,
            consensus_payload: source.read_var_bytes()?.to_vec(),
            next_book_keeper: source.read_hash20()?,
        })
    }

    /// Canonical encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut sink = Sink::with_capacity(Self::MIN_ENCODED_LEN + self.consensus_payload.len() + 8);
        sink.write_u32(self.version);
        sink.write_u64(self.chain_id);
        sink.write_hash32(&self.prev_block_hash);
        sink.write_hash32(&self.transaction_root);
        sink.write_hash32(&self.cross_states_root);
        sink.write_hash32(&self.block_root);
        sink.write_u32(self.timestamp);
        sink.write_u32(self.height);
        sink.write_u64(self.consensus_data);
        sink.write_var_bytes(&self.consensus_payload);
        sink.write_hash20(&self.next_book_keeper);
        sink.into_bytes()
    }
}

/// Header hash as signed by the keepers and committed under `blockRoot`.
pub fn header_hash(raw: &[u8]) -> Hash32 {
    hash256(raw)
}
