//! Event sink adapters.

use crate::domain::events::RelayEvent;
use crate::ports::outbound::EventSink;
use parking_lot::RwLock;
use tracing::info;

/// Keeps every emitted event, in order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: RwLock<Vec<RelayEvent>>,
}

impl RecordingEventSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<RelayEvent> {
        self.events.read().clone()
    }

    /// Number of events received.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether no event has been received.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<RelayEvent> {
        std::mem::take(&mut *self.events.write())
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: RelayEvent) {
        self.events.write().push(event);
    }
}

/// Writes each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: RelayEvent) {
        match &event {
            RelayEvent::BookKeeperChanged { height, raw_header } => info!(
                event = event.name(),
                height,
                header_len = raw_header.len(),
                "[xcr-04] event"
            ),
            RelayEvent::CrossChainLock {
                caller,
                target_chain_id,
                request_key,
                ..
            } => info!(
                event = event.name(),
                caller = %caller,
                target_chain_id,
                request_key = %hex::encode(request_key),
                "[xcr-04] event"
            ),
            RelayEvent::CrossChainUnlock {
                from_chain_id,
                to_contract,
                tx_hash,
            } => info!(
                event = event.name(),
                from_chain_id,
                to_contract = %to_contract,
                tx_hash = %hex::encode(tx_hash),
                "[xcr-04] event"
            ),
            RelayEvent::OwnerChanged { owner } => {
                info!(event = event.name(), owner = %owner, "[xcr-04] event")
            }
        }
    }
}
