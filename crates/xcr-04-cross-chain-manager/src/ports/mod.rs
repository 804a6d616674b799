//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that relayers and local contracts use
//! - **Outbound (Driven)**: storage, event delivery and local handlers

pub mod inbound;
pub mod outbound;
