//! # Relay Events
//!
//! Emitted to the `EventSink` only after the state change they describe has
//! been committed.

use shared_types::Hash20;

/// Events emitted by the cross-chain manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// A keeper set was installed (genesis) or rotated in.
    BookKeeperChanged {
        /// Activation height.
        height: u32,
        /// Raw header that activated the set.
        raw_header: Vec<u8>,
    },
    /// An outbound request was registered.
    CrossChainLock {
        /// Invoking account.
        caller: Hash20,
        /// Contract recorded as the request's origin.
        from_contract: Vec<u8>,
        /// Destination chain.
        target_chain_id: u64,
        /// Storage key of the persisted envelope.
        request_key: Vec<u8>,
        /// Handler arguments carried to the destination.
        payload: Vec<u8>,
    },
    /// An inbound message was delivered.
    CrossChainUnlock {
        /// Source chain.
        from_chain_id: u64,
        /// Handler that accepted the message.
        to_contract: Hash20,
        /// Relay-chain transaction hash.
        tx_hash: Vec<u8>,
    },
    /// Administration passed to a new owner.
    OwnerChanged {
        /// New owner.
        owner: Hash20,
    },
}

impl RelayEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RelayEvent::BookKeeperChanged { .. } => "BookKeeperChanged",
            RelayEvent::CrossChainLock { .. } => "CrossChainLock",
            RelayEvent::CrossChainUnlock { .. } => "CrossChainUnlock",
            RelayEvent::OwnerChanged { .. } => "OwnerChanged",
        }
    }
}
