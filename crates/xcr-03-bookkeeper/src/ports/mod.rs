//! # Ports Layer
//!
//! - **Outbound (Driven)**: epoch persistence

pub mod outbound;
