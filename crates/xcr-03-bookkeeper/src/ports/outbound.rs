//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::epoch::EpochState;
use crate::domain::errors::BookKeeperError;

/// What kind of epoch change is being committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First keeper set. Sets the genesis flag.
    Genesis,
    /// Signed replacement of the current keeper set.
    Rotation,
}

/// Persistence for the authoritative epoch.
///
/// `commit_epoch` must write the height, the keeper set and (for
/// [`Transition::Genesis`]) the genesis flag as one atomic unit.
pub trait EpochStore {
    /// Current epoch, or `None` before genesis.
    fn load_epoch(&self) -> Result<Option<EpochState>, BookKeeperError>;

    /// Replace the current epoch.
    fn commit_epoch(
        &mut self,
        state: &EpochState,
        transition: Transition,
    ) -> Result<(), BookKeeperError>;
}
