//! # Domain Layer
//!
//! Configuration, storage keys, events and the error taxonomy.

pub mod config;
pub mod entities;
pub mod errors;
pub mod events;
pub mod keys;

pub use config::{parse_address, RelayConfig, DEFAULT_LOCAL_CHAIN_ID};
pub use entities::{InboundCall, InvocationContext};
pub use errors::{
    DispatchError, DispatchFailure, KVStoreError, MalformedInput, PolicyViolation, RelayError,
    VerificationFailure,
};
pub use events::RelayEvent;
pub use keys::KeyPrefix;
