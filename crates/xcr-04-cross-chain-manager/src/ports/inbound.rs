//! # Inbound Ports (Driving Ports / API)
//!
//! The surface relayers, local contracts and operators call.

use crate::domain::entities::InvocationContext;
use crate::domain::errors::RelayError;
use k256::ecdsa::VerifyingKey;
use shared_types::Hash20;
use xcr_01_codec::{CrossChainTxParameter, ToMerkleValue};
use xcr_03_bookkeeper::Transition;

/// Cross-chain manager API.
pub trait CrossChainManagerApi {
    /// Verify and execute one inbound message.
    ///
    /// `header_proof` and `anchor_raw_header` are only read when the message
    /// header predates the current epoch; pass empty slices otherwise.
    ///
    /// Returns the delivered leaf.
    fn submit(
        &mut self,
        proof: &[u8],
        raw_header: &[u8],
        header_proof: &[u8],
        anchor_raw_header: &[u8],
        signatures: &[u8],
    ) -> Result<ToMerkleValue, RelayError>;

    /// Register an outbound request and return its storage key.
    fn register_outbound(
        &mut self,
        ctx: &InvocationContext,
        target_chain_id: u64,
        target_address: &[u8],
        method: &[u8],
        payload: &[u8],
    ) -> Result<Vec<u8>, RelayError>;

    /// Genesis (height 0) or signed rotation of the keeper set.
    fn rotate_book_keeper(
        &mut self,
        raw_header: &[u8],
        raw_keys: &[u8],
        signatures: &[u8],
    ) -> Result<Transition, RelayError>;

    /// Current owner.
    fn owner(&self) -> Result<Hash20, RelayError>;

    /// Whether `id` is the current owner.
    fn is_owner(&self, id: &Hash20) -> Result<bool, RelayError>;

    /// Transfer ownership. Only the current owner may call.
    fn set_owner(&mut self, caller: &Hash20, new_owner: Hash20) -> Result<(), RelayError>;

    /// Current keepers in signing order, empty before genesis.
    fn book_keepers(&self) -> Result<Vec<VerifyingKey>, RelayError>;

    /// Whether genesis has been performed.
    fn is_genesised(&self) -> Result<bool, RelayError>;

    /// Activation height of the current keeper set.
    fn current_epoch_height(&self) -> Result<Option<u32>, RelayError>;

    /// Stored outbound envelope.
    fn request(
        &self,
        target_chain_id: u64,
        request_id: u64,
    ) -> Result<Option<CrossChainTxParameter>, RelayError>;

    /// Whether an inbound message has been executed.
    fn is_executed(&self, from_chain_id: u64, tx_hash: &[u8]) -> Result<bool, RelayError>;
}
