//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod epoch_store;
pub mod events;
pub mod memory;
pub mod registry;

pub use epoch_store::{read_epoch, KvEpochStore};
pub use events::{RecordingEventSink, TracingEventSink};
pub use memory::InMemoryKVStore;
pub use registry::HandlerRegistry;
