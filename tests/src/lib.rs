//! # Cross-Chain Relay Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── exploits/         # Attack simulations against the verification path
//! │   ├── replay.rs
//! │   ├── signature_order.rs
//! │   └── forged_proof.rs
//! │
//! └── integration/      # Multi-crate flows through the manager
//!     ├── relay_flows.rs
//!     ├── epoch_rotation.rs
//!     └── outbound.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p xcr-tests
//!
//! # By category
//! cargo test -p xcr-tests integration::
//! cargo test -p xcr-tests exploits::
//! ```

pub mod exploits;
pub mod integration;

use relay_telemetry::{init_telemetry, TelemetryConfig};
use std::sync::Once;

static TELEMETRY: Once = Once::new();

/// Install logging and register relay metrics the way a host process does
/// at startup. Safe to call from every test; only the first call acts.
pub fn init_test_telemetry() {
    TELEMETRY.call_once(|| {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::from_env()
        };
        // Another subscriber may already be installed by the harness.
        if let Err(e) = init_telemetry(&config) {
            eprintln!("telemetry not installed: {}", e);
        }
    });
}
