//! # Integration Tests
//!
//! Flows that cross the codec, prover, bookkeeper and manager crates.

pub mod epoch_rotation;
pub mod outbound;
pub mod relay_flows;
