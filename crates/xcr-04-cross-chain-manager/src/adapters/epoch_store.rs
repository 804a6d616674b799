//! Keeper epoch persisted in the manager's key-value namespace.
//!
//! | Key | Value |
//! |-----|-------|
//! | `02 01` | activation height, `u32` little-endian |
//! | `02 04` | bincode [`KeeperSetRecord`] |
//! | `05 01` | `[1]` once genesis is done |

use crate::domain::errors::KVStoreError;
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use xcr_03_bookkeeper::{BookKeeperError, EpochState, EpochStore, KeeperSetRecord, Transition};

const GENESIS_FLAG: [u8; 1] = [1];

fn storage(err: KVStoreError) -> BookKeeperError {
    BookKeeperError::Storage(err.to_string())
}

/// Read the current epoch from `kv`. `None` until the genesis flag is set.
pub fn read_epoch<KV: KeyValueStore + ?Sized>(kv: &KV) -> Result<Option<EpochState>, BookKeeperError> {
    if !kv.exists(&KeyPrefix::Genesis.key(&[])).map_err(storage)? {
        return Ok(None);
    }

    let height_bytes = kv
        .get(&KeyPrefix::CurrentEpochHeight.key(&[]))
        .map_err(storage)?
        .ok_or_else(|| BookKeeperError::CorruptState("epoch height missing".to_string()))?;
    let height = <[u8; 4]>::try_from(height_bytes.as_slice())
        .map(u32::from_le_bytes)
        .map_err(|_| {
            BookKeeperError::CorruptState(format!(
                "epoch height is {} bytes, expected 4",
                height_bytes.len()
            ))
        })?;

    let record_bytes = kv
        .get(&KeyPrefix::KeeperSet.key(&[]))
        .map_err(storage)?
        .ok_or_else(|| BookKeeperError::CorruptState("keeper set missing".to_string()))?;
    let book_keeper = KeeperSetRecord::from_bytes(&record_bytes)?.into_book_keeper()?;

    Ok(Some(EpochState {
        height,
        book_keeper,
    }))
}

/// [`EpochStore`] view over a borrowed key-value store.
#[derive(Debug)]
pub struct KvEpochStore<'a, KV: KeyValueStore> {
    kv: &'a mut KV,
}

impl<'a, KV: KeyValueStore> KvEpochStore<'a, KV> {
    /// Borrow `kv` for the duration of one operation.
    pub fn new(kv: &'a mut KV) -> Self {
        Self { kv }
    }
}

impl<KV: KeyValueStore> EpochStore for KvEpochStore<'_, KV> {
    fn load_epoch(&self) -> Result<Option<EpochState>, BookKeeperError> {
        read_epoch(&*self.kv)
    }

    fn commit_epoch(
        &mut self,
        state: &EpochState,
        transition: Transition,
    ) -> Result<(), BookKeeperError> {
        let genesis_key = KeyPrefix::Genesis.key(&[]);
        let genesised = self.kv.exists(&genesis_key).map_err(storage)?;
        match transition {
            Transition::Genesis if genesised => return Err(BookKeeperError::AlreadyGenesised),
            Transition::Rotation if !genesised => return Err(BookKeeperError::NotGenesised),
            _ => {}
        }

        let record = KeeperSetRecord::from_book_keeper(&state.book_keeper).to_bytes()?;
        let mut batch = vec![
            BatchOperation::put(
                KeyPrefix::CurrentEpochHeight.key(&[]),
                state.height.to_le_bytes().to_vec(),
            ),
            BatchOperation::put(KeyPrefix::KeeperSet.key(&[]), record),
        ];
        if transition == Transition::Genesis {
            batch.push(BatchOperation::put(genesis_key, GENESIS_FLAG.to_vec()));
        }
        self.kv.atomic_batch_write(batch).map_err(storage)
    }
}
