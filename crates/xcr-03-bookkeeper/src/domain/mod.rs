//! # Domain Layer
//!
//! Keeper-set derivation, threshold verification and epoch state.
//! No I/O; persistence goes through the `EpochStore` port.

pub mod epoch;
pub mod errors;
pub mod keeper;
pub mod threshold;
