//! In-memory epoch store for tests and tooling.

use crate::domain::epoch::EpochState;
use crate::domain::errors::BookKeeperError;
use crate::ports::outbound::{EpochStore, Transition};

/// Holds the epoch in memory and counts commits.
#[derive(Debug, Default)]
pub struct InMemoryEpochStore {
    state: Option<EpochState>,
    commits: usize,
}

impl InMemoryEpochStore {
    /// Empty store (pre-genesis).
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful commits.
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl EpochStore for InMemoryEpochStore {
    fn load_epoch(&self) -> Result<Option<EpochState>, BookKeeperError> {
        Ok(self.state.clone())
    }

    fn commit_epoch(
        &mut self,
        state: &EpochState,
        transition: Transition,
    ) -> Result<(), BookKeeperError> {
        if transition == Transition::Genesis && self.state.is_some() {
            return Err(BookKeeperError::AlreadyGenesised);
        }
        self.state = Some(state.clone());
        self.commits += 1;
        Ok(())
    }
}
