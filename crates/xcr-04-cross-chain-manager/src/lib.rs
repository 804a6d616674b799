//! # XCR-04 Cross-Chain Manager
//!
//! Entry point for relayed traffic. Verifies that an inbound message was
//! committed by the relay chain, executes it exactly once through a local
//! handler, and records outbound requests for relayers.
//!
//! **Subsystem ID:** 04
//! **Status:** Production-Ready
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): configuration, storage keys, events, errors
//! - **Ports Layer** (`ports/`): `CrossChainManagerApi` (inbound);
//!   `KeyValueStore`, `EventSink`, `CrossChainHandler` with its staged
//!   `ContractStorage` (outbound)
//! - **Adapters Layer** (`adapters/`): in-memory KV, event sinks, handler
//!   registry, keeper epoch over the KV namespace
//! - **Service Layer** (`service.rs`): `CrossChainManager`
//!
//! ## Security Notes
//!
//! - A message is executed only if its header carries a keeper quorum,
//!   directly or through a signed anchor header.
//! - The replay guard is written only after the handler reports success.
//! - Dispatch failures are the only retryable errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Relay-chain simulation fixtures.
///
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export public API
pub use adapters::{
    read_epoch, HandlerRegistry, InMemoryKVStore, KvEpochStore, RecordingEventSink,
    TracingEventSink,
};
pub use domain::{
    parse_address, DispatchError, DispatchFailure, InboundCall, InvocationContext, KVStoreError,
    KeyPrefix, MalformedInput, PolicyViolation, RelayConfig, RelayError, RelayEvent,
    VerificationFailure, DEFAULT_LOCAL_CHAIN_ID,
};
pub use ports::inbound::CrossChainManagerApi;
pub use ports::outbound::{
    BatchOperation, ContractStorage, CrossChainHandler, EventSink, KeyValueStore,
};
pub use service::CrossChainManager;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
