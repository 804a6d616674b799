//! # Storage Keys
//!
//! One flat namespace of two-byte prefixes.
//!
//! | Table | Prefix | Suffix |
//! |-------|--------|--------|
//! | request id counter | `01 01` | `chainTag` |
//! | request envelopes | `01 02` | `chainTag ‖ u64le(requestId)` |
//! | current epoch height | `02 01` | none |
//! | keeper set | `02 04` | none |
//! | executed-tx flags | `03 01` | `fromChainId ‖ txHash` |
//! | owner | `04 01` | none |
//! | genesis flag | `05 01` | none |
//! | handler state | `06 01` | `contract ‖ handlerKey` |
//!
//! `chainTag` is the 8-byte little-endian destination chain id.

use shared_types::{ChainId, Hash20};

/// Key prefixes for the manager's key-value namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Next request id per destination chain
    RequestId,
    /// Persisted outbound envelopes
    Request,
    /// Activation height of the current keeper set
    CurrentEpochHeight,
    /// Current keeper set record
    KeeperSet,
    /// Replay guard flags
    Transaction,
    /// Administrator id
    Owner,
    /// Set once genesis has been performed
    Genesis,
    /// State written by local handlers, one namespace per contract
    ContractState,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::RequestId => &[0x01, 0x01],
            KeyPrefix::Request => &[0x01, 0x02],
            KeyPrefix::CurrentEpochHeight => &[0x02, 0x01],
            KeyPrefix::KeeperSet => &[0x02, 0x04],
            KeyPrefix::Transaction => &[0x03, 0x01],
            KeyPrefix::Owner => &[0x04, 0x01],
            KeyPrefix::Genesis => &[0x05, 0x01],
            KeyPrefix::ContractState => &[0x06, 0x01],
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    /// Request counter key for a destination chain.
    pub fn request_id_key(target: &ChainId) -> Vec<u8> {
        KeyPrefix::RequestId.key(target.as_bytes())
    }

    /// Envelope key for a destination chain and request id.
    pub fn request_key(target: &ChainId, request_id: u64) -> Vec<u8> {
        let mut key = KeyPrefix::Request.key(target.as_bytes());
        key.extend_from_slice(&request_id.to_le_bytes());
        key
    }

    /// Replay guard key for an inbound message.
    pub fn executed_key(from_chain: &ChainId, tx_hash: &[u8]) -> Vec<u8> {
        let mut key = KeyPrefix::Transaction.key(from_chain.as_bytes());
        key.extend_from_slice(tx_hash);
        key
    }

    /// Key of `handler_key` inside the state namespace of `contract`.
    pub fn contract_key(contract: &Hash20, handler_key: &[u8]) -> Vec<u8> {
        let mut key = KeyPrefix::ContractState.key(contract.as_bytes());
        key.extend_from_slice(handler_key);
        key
    }
}
