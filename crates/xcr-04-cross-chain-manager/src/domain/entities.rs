//! # Domain Entities

use shared_types::{Hash20, Hash32};
use xcr_01_codec::ToMerkleValue;

/// Who is invoking the manager and in which transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationContext {
    /// Calling contract or account.
    pub caller: Hash20,
    /// Hash of the local transaction carrying the call.
    pub tx_hash: Hash32,
}

impl InvocationContext {
    /// Build a context.
    pub fn new(caller: Hash20, tx_hash: Hash32) -> Self {
        Self { caller, tx_hash }
    }
}

/// A verified inbound message as a handler sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCall {
    /// Method name bytes.
    pub method: Vec<u8>,
    /// Opaque arguments.
    pub args: Vec<u8>,
    /// Contract that originated the request on the source chain.
    pub from_contract: Vec<u8>,
    /// Source chain.
    pub from_chain_id: u64,
    /// Relay-chain transaction hash.
    pub tx_hash: Vec<u8>,
    /// Source-side request id.
    pub cross_chain_id: Vec<u8>,
}

impl InboundCall {
    /// Project a proven leaf onto the handler call.
    pub fn from_value(value: &ToMerkleValue, from_chain_id: u64) -> Self {
        Self {
            method: value.tx_param.method.clone(),
            args: value.tx_param.args.clone(),
            from_contract: value.tx_param.from_contract.clone(),
            from_chain_id,
            tx_hash: value.tx_hash.clone(),
            cross_chain_id: value.tx_param.cross_chain_id.clone(),
        }
    }

    /// Method name, if it is UTF-8.
    pub fn method_name(&self) -> Option<&str> {
        std::str::from_utf8(&self.method).ok()
    }
}
