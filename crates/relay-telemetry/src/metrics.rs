//! Prometheus metrics for the relay core.
//!
//! All metrics follow the naming convention: `xcr_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INBOUND
    // =========================================================================

    /// Inbound messages dispatched to a handler successfully
    pub static ref MESSAGES_DISPATCHED: Counter = Counter::new(
        "xcr_inbound_messages_dispatched_total",
        "Total inbound cross-chain messages dispatched"
    ).expect("metric creation failed");

    /// Inbound messages refused by the replay guard
    pub static ref REPLAYS_REJECTED: Counter = Counter::new(
        "xcr_inbound_replays_rejected_total",
        "Total inbound messages rejected as already processed"
    ).expect("metric creation failed");

    /// Threshold signature checks that did not reach quorum
    pub static ref SIGNATURE_FAILURES: Counter = Counter::new(
        "xcr_signature_failures_total",
        "Total header signature checks that failed quorum"
    ).expect("metric creation failed");

    // =========================================================================
    // KEEPERS
    // =========================================================================

    /// Keeper set installations (genesis and rotation)
    pub static ref KEEPER_ROTATIONS: CounterVec = CounterVec::new(
        Opts::new("xcr_keeper_rotations_total", "Keeper set changes by kind"),
        &["kind"]  // genesis/rotation
    ).expect("metric creation failed");

    // =========================================================================
    // OUTBOUND
    // =========================================================================

    /// Outbound requests registered
    pub static ref OUTBOUND_REGISTERED: Counter = Counter::new(
        "xcr_outbound_requests_registered_total",
        "Total outbound cross-chain requests registered"
    ).expect("metric creation failed");

    // =========================================================================
    // ERRORS
    // =========================================================================

    /// Relay errors by class
    pub static ref RELAY_ERRORS: CounterVec = CounterVec::new(
        Opts::new("xcr_relay_errors_total", "Relay errors by class"),
        &["class"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(MESSAGES_DISPATCHED.clone()),
        Box::new(REPLAYS_REJECTED.clone()),
        Box::new(SIGNATURE_FAILURES.clone()),
        Box::new(KEEPER_ROTATIONS.clone()),
        Box::new(OUTBOUND_REGISTERED.clone()),
        Box::new(RELAY_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
