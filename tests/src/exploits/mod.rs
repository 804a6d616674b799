//! # Exploit Simulations
//!
//! Each module plays an attacker against the inbound verification path and
//! asserts the manager refuses without touching state or handlers.

pub mod forged_proof;
pub mod replay;
pub mod signature_order;
