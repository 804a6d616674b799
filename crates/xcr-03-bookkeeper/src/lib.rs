//! # XCR-03 BookKeeper Manager
//!
//! Maintains the relay chain's authoritative keeper (validator) set and
//! verifies ordered threshold signatures over raw headers.
//!
//! **Subsystem ID:** 03
//! **Status:** Production-Ready
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): key compression, commitments, threshold
//!   verification, epoch state. No I/O.
//! - **Ports Layer** (`ports/`): `EpochStore` persistence port
//! - **Adapters Layer** (`adapters/`): in-memory `EpochStore`
//! - **Service Layer** (`service.rs`): genesis and rotation rules
//!
//! ## Security Notes
//!
//! - Exactly one keeper set is authoritative; rotation replaces it wholesale.
//! - A rotation must be signed by the keepers it replaces.
//! - Signatures count only in keeper order, each keeper at most once.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryEpochStore;
pub use domain::epoch::{EpochState, KeeperSetRecord, RotationPolicy};
pub use domain::errors::BookKeeperError;
pub use domain::keeper::{
    compress_keeper_key, derive_book_keeper, quorum, BookKeeper, COMPRESSED_RECORD_LEN,
    KEEPER_RECORD_LEN,
};
pub use domain::threshold::{
    check_slot, verify_ordered, SignatureCheck, SIGNATURE_LEN, SIGNATURE_RS_LEN,
};
pub use ports::outbound::{EpochStore, Transition};
pub use service::{BookKeeperManager, EpochChange};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
