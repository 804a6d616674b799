//! # Relay Configuration

use super::errors::{PolicyViolation, RelayError};
use serde::{Deserialize, Serialize};
use shared_types::{ChainId, Hash20};
use std::env;

/// Chain id the relay chain assigns to this deployment.
pub const DEFAULT_LOCAL_CHAIN_ID: u64 = 88;

/// Cross-chain manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Chain id inbound messages must target.
    pub local_chain_id: u64,
    /// Address of the manager itself. Feeds `crossChainId` and the
    /// self-call check.
    pub manager_address: Hash20,
    /// Owner used until one is explicitly set.
    pub origin_owner: Hash20,
    /// Accept keeper rotations at the current epoch height.
    pub allow_same_height_rotation: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            local_chain_id: DEFAULT_LOCAL_CHAIN_ID,
            manager_address: Hash20::zero(),
            origin_owner: Hash20::zero(),
            allow_same_height_rotation: false,
        }
    }
}

impl RelayConfig {
    /// Create configuration for testing with distinct, recognisable addresses.
    pub fn for_testing() -> Self {
        Self {
            local_chain_id: DEFAULT_LOCAL_CHAIN_ID,
            manager_address: Hash20([0xCC; 20]),
            origin_owner: Hash20([0x0A; 20]),
            allow_same_height_rotation: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `XCR_LOCAL_CHAIN_ID`: Local chain id (default: 88)
    /// - `XCR_MANAGER_ADDRESS`: 20-byte hex manager address (default: zero)
    /// - `XCR_ORIGIN_OWNER`: 20-byte hex initial owner (default: zero)
    /// - `XCR_ALLOW_SAME_HEIGHT_ROTATION`: `true`/`1` to admit equal heights
    pub fn from_env() -> Result<Self, RelayError> {
        let defaults = Self::default();

        let local_chain_id = match env::var("XCR_LOCAL_CHAIN_ID") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| RelayError::Config(format!("XCR_LOCAL_CHAIN_ID: not a u64: {}", raw)))?,
            Err(_) => defaults.local_chain_id,
        };

        let manager_address = match env::var("XCR_MANAGER_ADDRESS") {
            Ok(raw) => parse_address("XCR_MANAGER_ADDRESS", &raw)?,
            Err(_) => defaults.manager_address,
        };

        let origin_owner = match env::var("XCR_ORIGIN_OWNER") {
            Ok(raw) => parse_address("XCR_ORIGIN_OWNER", &raw)?,
            Err(_) => defaults.origin_owner,
        };

        let allow_same_height_rotation = env::var("XCR_ALLOW_SAME_HEIGHT_ROTATION")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(defaults.allow_same_height_rotation);

        let config = Self {
            local_chain_id,
            manager_address,
            origin_owner,
            allow_same_height_rotation,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the wire format cannot carry.
    pub fn validate(&self) -> Result<(), RelayError> {
        self.local_chain_tag().map(|_| ())
    }

    /// Local chain id as the 8-byte envelope field.
    pub fn local_chain_tag(&self) -> Result<ChainId, RelayError> {
        ChainId::from_u64(self.local_chain_id).map_err(|source| {
            RelayError::Policy(PolicyViolation::InvalidChainId {
                chain_id: self.local_chain_id,
                source,
            })
        })
    }
}

/// Parse a 20-byte address written as hex, with or without `0x`.
pub fn parse_address(name: &str, raw: &str) -> Result<Hash20, RelayError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes =
        hex::decode(digits).map_err(|e| RelayError::Config(format!("{}: {}", name, e)))?;
    Hash20::from_slice(&bytes).map_err(|e| RelayError::Config(format!("{}: {}", name, e)))
}
