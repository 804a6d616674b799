//! # Ordered Threshold Verification
//!
//! Checks that at least `m` of `n` keepers signed a raw header, with the
//! signatures packed in keeper order.
//!
//! ## Algorithm
//!
//! ```text
//! i = 0 (signature slot), j = 0 (keeper)
//! while i < m && j < n:
//!     if slot[i] verifies under keepers[j]: i += 1
//!     j += 1
//! pass iff i >= m
//! ```
//!
//! A slot is 65 bytes (`r ‖ s ‖ v`); only `r ‖ s` is read. Keepers signing
//! out of order are skipped past and cannot be counted.
//!
//! ## Message
//!
//! Keepers sign `hash256(rawHeader)` with ECDSA over SHA-256, so the curve
//! digest is `SHA256(hash256(rawHeader))`.

use super::keeper::quorum;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use shared_types::hash256;

/// Width of one packed signature slot.
pub const SIGNATURE_LEN: usize = 65;

/// Leading bytes of a slot that carry `r ‖ s`.
pub const SIGNATURE_RS_LEN: usize = 64;

/// Outcome of checking one slot against one keeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// Slot is a valid signature by this keeper.
    Match,
    /// Slot parses but was not produced by this keeper.
    NoMatch,
    /// Slot is missing or not a parsable signature.
    Malformed,
}

impl SignatureCheck {
    /// Only `Match` advances the signature cursor.
    pub fn is_match(self) -> bool {
        matches!(self, SignatureCheck::Match)
    }
}

/// Check signature slot `slot` of `blob` against `keeper`.
///
/// `signed` is the message the keepers signed, i.e. `hash256(rawHeader)`.
pub fn check_slot(signed: &[u8], blob: &[u8], slot: usize, keeper: &VerifyingKey) -> SignatureCheck {
    let start = slot * SIGNATURE_LEN;
    let Some(rs) = blob.get(start..start + SIGNATURE_RS_LEN) else {
        return SignatureCheck::Malformed;
    };
    let Ok(signature) = Signature::from_slice(rs) else {
        return SignatureCheck::Malformed;
    };
    match keeper.verify(signed, &signature) {
        Ok(()) => SignatureCheck::Match,
        Err(_) => SignatureCheck::NoMatch,
    }
}

/// Ordered `m`-of-`n` verification of `blob` over `raw_header`.
pub fn verify_ordered(raw_header: &[u8], blob: &[u8], keepers: &[VerifyingKey]) -> bool {
    let n = keepers.len();
    if n == 0 {
        return false;
    }
    let m = quorum(n);
    let signed = hash256(raw_header);

    let (mut i, mut j) = (0usize, 0usize);
    while i < m && j < n {
        let outcome = check_slot(signed.as_bytes(), blob, i, &keepers[j]);
        if outcome == SignatureCheck::Malformed {
            tracing::trace!(slot = i, keeper = j, "[xcr-03] malformed signature slot");
        }
        if outcome.is_match() {
            i += 1;
        }
        j += 1;
    }
    i >= m
}
