//! # Message Envelope Codec
//!
//! Outbound requests (`CrossChainTxParameter`) and the inbound leaf committed
//! under a header's `crossStatesRoot` (`ToMerkleValue`).
//!
//! ## Wire Order
//!
//! ```text
//! CrossChainTxParameter:
//!   txHash varbytes | crossChainId varbytes | fromContract varbytes
//!   | toChainId 8 LE | toContract varbytes | method varbytes | args varbytes
//!
//! ToMerkleValue:
//!   txHash varbytes | fromChainId 8 LE | CrossChainTxParameter
//! ```

use crate::binary::{Sink, Source};
use crate::errors::CodecError;
use shared_types::ChainId;

/// Canonical cross-chain call envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossChainTxParameter {
    /// Hash of the originating transaction.
    pub tx_hash: Vec<u8>,
    /// Globally unique request id (`sha256(manager ++ txHash)` on the source side).
    pub cross_chain_id: Vec<u8>,
    /// Contract that registered the request on the source chain.
    pub from_contract: Vec<u8>,
    /// Destination chain.
    pub to_chain_id: ChainId,
    /// Handler address on the destination chain.
    pub to_contract: Vec<u8>,
    /// Handler method name.
    pub method: Vec<u8>,
    /// Opaque handler arguments.
    pub args: Vec<u8>,
}

impl CrossChainTxParameter {
    /// Append the canonical encoding to `sink`.
    pub fn write_to(&self, sink: &mut Sink) {
        sink.write_var_bytes(&self.tx_hash);
        sink.write_var_bytes(&self.cross_chain_id);
        sink.write_var_bytes(&self.from_contract);
        sink.write_le_uint(&self.to_chain_id);
        sink.write_var_bytes(&self.to_contract);
        sink.write_var_bytes(&self.method);
        sink.write_var_bytes(&self.args);
    }

    /// Read one parameter from `source`.
    pub fn read_from(source: &mut Source<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            tx_hash: source.read_var_bytes()?.to_vec(),
            cross_chain_id: source.read_var_bytes()?.to_vec(),
            from_contract: source.read_var_bytes()?.to_vec(),
            to_chain_id: source.read_le_uint("toChainId")?,
            to_contract: source.read_var_bytes()?.to_vec(),
            method: source.read_var_bytes()?.to_vec(),
            args: source.read_var_bytes()?.to_vec(),
        })
    }

    fn encoded_len_hint(&self) -> usize {
        self.tx_hash.len()
            + self.cross_chain_id.len()
            + self.from_contract.len()
            + self.to_contract.len()
            + self.method.len()
            + self.args.len()
            + 8
            + 6 * 9
    }
}

/// Inbound leaf value proven under `crossStatesRoot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToMerkleValue {
    /// Hash of the relay-chain transaction carrying the message.
    pub tx_hash: Vec<u8>,
    /// Chain the message originated on.
    pub from_chain_id: ChainId,
    /// The original outbound envelope.
    pub tx_param: CrossChainTxParameter,
}

impl ToMerkleValue {
    /// Wrap an outbound parameter as the relay chain commits it.
    pub fn wrap(tx_hash: Vec<u8>, from_chain_id: ChainId, tx_param: CrossChainTxParameter) -> Self {
        Self {
            tx_hash,
            from_chain_id,
            tx_param,
        }
    }

    /// Canonical encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut sink = Sink::with_capacity(self.tx_hash.len() + 17 + self.tx_param.encoded_len_hint());
        sink.write_var_bytes(&self.tx_hash);
        sink.write_le_uint(&self.from_chain_id);
        self.tx_param.write_to(&mut sink);
        sink.into_bytes()
    }

    /// Strict decode: every field must be present and nothing may follow.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut source = Source::new(bytes);
        let value = Self {
            tx_hash: source.read_var_bytes()?.to_vec(),
            from_chain_id: source.read_le_uint("fromChainId")?,
            tx_param: CrossChainTxParameter::read_from(&mut source)?,
        };
        if !source.is_exhausted() {
            return Err(CodecError::TrailingBytes {
                structure: "ToMerkleValue",
                count: source.remaining(),
            });
        }
        Ok(value)
    }
}

/// Serialize an outbound request for persistence.
pub fn encode_outbound(param: &CrossChainTxParameter) -> Vec<u8> {
    let mut sink = Sink::with_capacity(param.encoded_len_hint());
    param.write_to(&mut sink);
    sink.into_bytes()
}

/// Decode a persisted outbound request.
pub fn decode_outbound(bytes: &[u8]) -> Result<CrossChainTxParameter, CodecError> {
    let mut source = Source::new(bytes);
    let param = CrossChainTxParameter::read_from(&mut source)?;
    if !source.is_exhausted() {
        return Err(CodecError::TrailingBytes {
            structure: "CrossChainTxParameter",
            count: source.remaining(),
        });
    }
    Ok(param)
}

/// Decode a proven inbound leaf.
pub fn decode_inbound(bytes: &[u8]) -> Result<ToMerkleValue, CodecError> {
    ToMerkleValue::decode(bytes)
}
