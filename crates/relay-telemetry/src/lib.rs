//! # Relay Telemetry
//!
//! Logging and metrics bootstrap for the cross-chain relay.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("telemetry");
//!     // Relay code logs through `tracing` and bumps the counters in `metrics`.
//! }
//! ```
//!
//! The relay crates only emit through `tracing` and bump the counters in
//! [`metrics`]. Installing the subscriber and registering the counters is the
//! host's job: call [`init_telemetry`] once at startup, before building the
//! `CrossChainManager`. Counters still count when it is never called, but
//! nothing is exported.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XCR_SERVICE_NAME` | `cross-chain-relay` | Service name in logs |
//! | `XCR_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `XCR_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `XCR_JSON_LOGS` | `false` | JSON log lines |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, KEEPER_ROTATIONS, MESSAGES_DISPATCHED, OUTBOUND_REGISTERED,
    RELAY_ERRORS, REPLAYS_REJECTED, SIGNATURE_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Global subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install logging.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
