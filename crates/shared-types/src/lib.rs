//! # Shared Types Crate
//!
//! Byte-level primitives used across the relay workspace.
//!
//! ## Design Principles
//!
//! - **Explicit widths**: `Hash32`, `Hash20` and `LeUint<N>` are distinct
//!   types. A 32-byte root can never be passed where a 20-byte keeper hash
//!   is expected.
//! - **Centralized endianness**: fixed-width integers crossing the trust
//!   boundary are little-endian and unsigned. The sign-bit check happens once,
//!   in `LeUint::from_le_slice`.
//! - **One hash vocabulary**: `sha256`, `hash256` (double SHA-256) and
//!   `hash160` (RIPEMD-160 over SHA-256) match the remote chain's
//!   definitions.

pub mod crypto;
pub mod errors;
pub mod primitives;
pub mod uint;

pub use crypto::{hash160, hash256, sha256};
pub use errors::PrimitiveError;
pub use primitives::{Hash20, Hash32};
pub use uint::{pad_right, ChainId, LeUint};
