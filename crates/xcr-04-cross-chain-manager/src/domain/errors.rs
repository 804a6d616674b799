//! # Domain Errors
//!
//! Error taxonomy for the cross-chain manager.
//!
//! | Class | Variant | Retryable |
//! |-------|---------|-----------|
//! | Malformed input | `Decode` | no |
//! | Verification failure | `Verification` | no |
//! | Replay | `AlreadyProcessed` | no |
//! | Dispatch failure | `Dispatch` | **yes** |
//! | Policy violation | `Policy` | no |
//! | Storage | `Storage` | no |
//!
//! No partial state is committed on any error path.

use shared_types::{Hash20, PrimitiveError};
use thiserror::Error;
use xcr_01_codec::CodecError;
use xcr_02_merkle_prover::MerkleError;
use xcr_03_bookkeeper::BookKeeperError;

/// Key-value store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError {
        /// Backend message.
        message: String,
    },
    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError {
        /// What was found.
        message: String,
    },
}

/// Error reported by a local handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Handler does not expose the requested method.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    /// Handler rejected the arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    /// Handler failed while executing.
    #[error("Handler failed: {0}")]
    Failed(String),
    /// Handler could not read its committed state.
    #[error("Handler storage error: {0}")]
    Storage(String),
}

impl From<KVStoreError> for DispatchError {
    fn from(err: KVStoreError) -> Self {
        DispatchError::Storage(err.to_string())
    }
}

/// Input that could not be decoded or has the wrong shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedInput {
    /// Header, envelope or varint decode failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Proof does not split into whole audit path entries.
    #[error(transparent)]
    Proof(MerkleError),
    /// Keeper key list is unusable.
    #[error(transparent)]
    KeyList(BookKeeperError),
    /// `toContract` is not a 20-byte address.
    #[error("toContract must be 20 bytes, got {0}")]
    ContractLength(usize),
}

/// A cryptographic or commitment check failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationFailure {
    /// Too few in-order keeper signatures.
    #[error("threshold signature quorum not met ({required} of {keepers} required)")]
    QuorumNotMet {
        /// Quorum size.
        required: usize,
        /// Keeper count.
        keepers: usize,
    },
    /// Merkle proof does not reach the committed root.
    #[error(transparent)]
    MerkleRoot(MerkleError),
    /// Offered keys do not match the header's keeper commitment.
    #[error("nextBookKeeper mismatch: header {expected}, derived {derived}")]
    KeeperHashMismatch {
        /// Commitment carried by the header.
        expected: Hash20,
        /// Commitment derived from the offered keys.
        derived: Hash20,
    },
    /// Header hash is not the value proven under the anchor's `blockRoot`.
    #[error("header is not committed under the anchor header's blockRoot")]
    AnchorCommitment,
}

/// A well-formed, verified request that the manager refuses to act on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    /// Message is addressed to another chain.
    #[error("message targets chain {actual}, local chain is {expected}")]
    WrongDestination {
        /// Local chain id.
        expected: u64,
        /// Destination carried by the message.
        actual: u64,
    },
    /// The manager itself tried to register an outbound request.
    #[error("manager cannot call itself")]
    SelfCall,
    /// Genesis attempted twice.
    #[error("genesis already performed")]
    AlreadyGenesised,
    /// Operation requires genesis.
    #[error("genesis has not been performed")]
    NotGenesised,
    /// Direct genesis with a non-zero header height.
    #[error("genesis header height must be 0, got {height}")]
    GenesisHeight {
        /// Offered height.
        height: u32,
    },
    /// Rotation header does not advance the epoch.
    #[error("header height {height} does not advance epoch height {current}")]
    HeightRegression {
        /// Offered height.
        height: u32,
        /// Current epoch height.
        current: u32,
    },
    /// Caller is not the owner.
    #[error("caller {caller} is not the owner")]
    Unauthorized {
        /// Rejected caller.
        caller: Hash20,
    },
    /// Chain id does not fit the 8-byte signed wire field.
    #[error("chain id {chain_id} is not representable: {source}")]
    InvalidChainId {
        /// Offending id.
        chain_id: u64,
        /// Why it was refused.
        #[source]
        source: PrimitiveError,
    },
    /// Request counter for a destination is exhausted.
    #[error("request counter exhausted for chain {chain_id}")]
    CounterExhausted {
        /// Destination chain.
        chain_id: u64,
    },
}

/// Why a verified message could not be delivered. Retryable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchFailure {
    /// No handler registered at the target address.
    #[error("no handler registered at {0}")]
    UnknownContract(Hash20),
    /// Handler returned `false`.
    #[error("handler at {contract} declined the call")]
    Declined {
        /// Target address.
        contract: Hash20,
    },
    /// Handler returned an error.
    #[error("handler at {contract} failed: {source}")]
    Handler {
        /// Target address.
        contract: Hash20,
        /// Handler error.
        #[source]
        source: DispatchError,
    },
}

/// Cross-chain manager error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// Malformed input.
    #[error("Malformed input: {0}")]
    Decode(MalformedInput),

    /// Signature, Merkle or commitment check failed.
    #[error("Verification failed: {0}")]
    Verification(VerificationFailure),

    /// Message was already executed.
    #[error("Transaction 0x{tx_hash} from chain {from_chain_id} already processed")]
    AlreadyProcessed {
        /// Source chain.
        from_chain_id: u64,
        /// Relay-chain transaction hash, hex encoded.
        tx_hash: String,
    },

    /// Handler resolution or execution failed.
    #[error("Dispatch failed: {0}")]
    Dispatch(DispatchFailure),

    /// Request refused by policy.
    #[error("Policy violation: {0}")]
    Policy(PolicyViolation),

    /// Key-value store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// Whether resubmitting the same input may succeed.
    ///
    /// Only dispatch failures qualify: the replay guard is left unset, so the
    /// identical proof can be submitted again once the handler recovers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RelayError::Dispatch(_))
    }

    /// Metric label for the error class.
    pub fn class(&self) -> &'static str {
        match self {
            RelayError::Decode(_) => "decode",
            RelayError::Verification(_) => "verification",
            RelayError::AlreadyProcessed { .. } => "replay",
            RelayError::Dispatch(_) => "dispatch",
            RelayError::Policy(_) => "policy",
            RelayError::Storage(_) => "storage",
            RelayError::Config(_) => "config",
        }
    }
}

impl From<CodecError> for RelayError {
    fn from(err: CodecError) -> Self {
        RelayError::Decode(MalformedInput::Codec(err))
    }
}

impl From<KVStoreError> for RelayError {
    fn from(err: KVStoreError) -> Self {
        RelayError::Storage(err.to_string())
    }
}

impl From<MerkleError> for RelayError {
    fn from(err: MerkleError) -> Self {
        match err {
            MerkleError::Codec(e) => RelayError::Decode(MalformedInput::Codec(e)),
            MerkleError::RootMismatch { .. } => {
                RelayError::Verification(VerificationFailure::MerkleRoot(err))
            }
            other => RelayError::Decode(MalformedInput::Proof(other)),
        }
    }
}

impl From<BookKeeperError> for RelayError {
    fn from(err: BookKeeperError) -> Self {
        match err {
            BookKeeperError::Codec(e) => RelayError::Decode(MalformedInput::Codec(e)),
            BookKeeperError::InvalidKeyList { .. }
            | BookKeeperError::EmptyKeyList
            | BookKeeperError::TooManyKeepers { .. }
            | BookKeeperError::InvalidKey { .. } => RelayError::Decode(MalformedInput::KeyList(err)),
            BookKeeperError::AlreadyGenesised => RelayError::Policy(PolicyViolation::AlreadyGenesised),
            BookKeeperError::NotGenesised => RelayError::Policy(PolicyViolation::NotGenesised),
            BookKeeperError::GenesisHeight { height } => {
                RelayError::Policy(PolicyViolation::GenesisHeight { height })
            }
            BookKeeperError::HeightRegression { height, current } => {
                RelayError::Policy(PolicyViolation::HeightRegression { height, current })
            }
            BookKeeperError::KeeperHashMismatch { expected, derived } => RelayError::Verification(
                VerificationFailure::KeeperHashMismatch { expected, derived },
            ),
            BookKeeperError::QuorumNotMet { required, keepers } => {
                RelayError::Verification(VerificationFailure::QuorumNotMet { required, keepers })
            }
            BookKeeperError::CorruptState(message) | BookKeeperError::Storage(message) => {
                RelayError::Storage(message)
            }
        }
    }
}
