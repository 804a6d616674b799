//! # BookKeeper Manager
//!
//! Application service that owns the genesis and rotation rules and persists
//! epoch changes through an [`EpochStore`].
//!
//! ## Rules
//!
//! - Genesis: once only, header height 0, derived commitment must equal the
//!   header's `nextBookKeeper`.
//! - Rotation: after genesis, height admitted by the [`RotationPolicy`],
//!   ordered threshold signatures by the *current* keepers over the raw
//!   header, derived commitment must equal the header's `nextBookKeeper`.
//!
//! Checks run cheapest first. The store is written only after every check
//! has passed.

use crate::domain::epoch::{EpochState, RotationPolicy};
use crate::domain::errors::BookKeeperError;
use crate::domain::keeper::derive_book_keeper;
use crate::domain::threshold::verify_ordered;
use crate::ports::outbound::{EpochStore, Transition};
use k256::ecdsa::VerifyingKey;
use tracing::{info, warn};
use xcr_01_codec::Header;

/// Result of a successful `rotate_book_keeper` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochChange {
    /// Genesis or rotation.
    pub transition: Transition,
    /// The newly authoritative epoch.
    pub state: EpochState,
}

/// Genesis and rotation rules for the keeper set.
#[derive(Debug, Clone, Default)]
pub struct BookKeeperManager {
    policy: RotationPolicy,
}

impl BookKeeperManager {
    /// Create a manager with the given height policy.
    pub fn new(policy: RotationPolicy) -> Self {
        Self { policy }
    }

    /// Height policy in force.
    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Install the first keeper set.
    pub fn bootstrap_genesis<S: EpochStore>(
        &self,
        store: &mut S,
        header: &Header,
        raw_keys: &[u8],
    ) -> Result<EpochState, BookKeeperError> {
        if store.load_epoch()?.is_some() {
            warn!("[xcr-03] genesis rejected: already performed");
            return Err(BookKeeperError::AlreadyGenesised);
        }
        if header.height != 0 {
            return Err(BookKeeperError::GenesisHeight {
                height: header.height,
            });
        }

        let book_keeper = derive_book_keeper(raw_keys)?;
        if book_keeper.next_book_keeper != header.next_book_keeper {
            return Err(BookKeeperError::KeeperHashMismatch {
                expected: header.next_book_keeper,
                derived: book_keeper.next_book_keeper,
            });
        }

        let state = EpochState {
            height: header.height,
            book_keeper,
        };
        store.commit_epoch(&state, Transition::Genesis)?;

        info!(
            keepers = state.book_keeper.len(),
            quorum = state.book_keeper.quorum(),
            next_book_keeper = %state.book_keeper.next_book_keeper,
            "[xcr-03] genesis keeper set installed"
        );
        Ok(state)
    }

    /// Replace the keeper set under signatures from the current keepers.
    ///
    /// `raw_header` must be the exact bytes `header` was decoded from.
    pub fn rotate<S: EpochStore>(
        &self,
        store: &mut S,
        raw_header: &[u8],
        header: &Header,
        raw_keys: &[u8],
        signatures: &[u8],
    ) -> Result<EpochState, BookKeeperError> {
        let current = store.load_epoch()?.ok_or(BookKeeperError::NotGenesised)?;

        if !self.policy.admits(header.height, current.height) {
            return Err(BookKeeperError::HeightRegression {
                height: header.height,
                current: current.height,
            });
        }

        self.verify_signatures(&current, raw_header, signatures)?;

        let book_keeper = derive_book_keeper(raw_keys)?;
        if book_keeper.next_book_keeper != header.next_book_keeper {
            return Err(BookKeeperError::KeeperHashMismatch {
                expected: header.next_book_keeper,
                derived: book_keeper.next_book_keeper,
            });
        }

        let state = EpochState {
            height: header.height,
            book_keeper,
        };
        store.commit_epoch(&state, Transition::Rotation)?;

        info!(
            from_height = current.height,
            to_height = state.height,
            keepers = state.book_keeper.len(),
            "[xcr-03] keeper set rotated"
        );
        Ok(state)
    }

    /// Public entry: height 0 bootstraps genesis, anything else rotates.
    pub fn rotate_book_keeper<S: EpochStore>(
        &self,
        store: &mut S,
        raw_header: &[u8],
        raw_keys: &[u8],
        signatures: &[u8],
    ) -> Result<EpochChange, BookKeeperError> {
        let header = Header::decode(raw_header)?;
        if header.height == 0 {
            let state = self.bootstrap_genesis(store, &header, raw_keys)?;
            return Ok(EpochChange {
                transition: Transition::Genesis,
                state,
            });
        }
        let state = self.rotate(store, raw_header, &header, raw_keys, signatures)?;
        Ok(EpochChange {
            transition: Transition::Rotation,
            state,
        })
    }

    /// Ordered threshold check of `signatures` over `raw_header` by the
    /// keepers of `epoch`.
    pub fn verify_signatures(
        &self,
        epoch: &EpochState,
        raw_header: &[u8],
        signatures: &[u8],
    ) -> Result<(), BookKeeperError> {
        if verify_ordered(raw_header, signatures, epoch.keepers()) {
            return Ok(());
        }
        warn!(
            epoch_height = epoch.height,
            signature_bytes = signatures.len(),
            "[xcr-03] threshold signature check failed"
        );
        Err(BookKeeperError::QuorumNotMet {
            required: epoch.book_keeper.quorum(),
            keepers: epoch.book_keeper.len(),
        })
    }

    /// Current keepers, empty before genesis.
    pub fn book_keepers<S: EpochStore>(&self, store: &S) -> Result<Vec<VerifyingKey>, BookKeeperError> {
        Ok(store
            .load_epoch()?
            .map(|state| state.book_keeper.keepers)
            .unwrap_or_default())
    }

    /// Whether genesis has been performed.
    pub fn is_genesised<S: EpochStore>(&self, store: &S) -> Result<bool, BookKeeperError> {
        Ok(store.load_epoch()?.is_some())
    }

    /// Activation height of the current epoch, `None` before genesis.
    pub fn current_epoch_height<S: EpochStore>(
        &self,
        store: &S,
    ) -> Result<Option<u32>, BookKeeperError> {
        Ok(store.load_epoch()?.map(|state| state.height))
    }
}
