//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the cross-chain manager requires the host to provide.

use crate::domain::entities::InboundCall;
use crate::domain::errors::{DispatchError, KVStoreError};
use crate::domain::events::RelayEvent;
use crate::domain::keys::KeyPrefix;
use shared_types::Hash20;
use std::fmt;
use std::sync::Arc;

/// Abstract interface for key-value database operations.
///
/// Testing: `InMemoryKVStore` (adapters/memory.rs)
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put {
        /// Key.
        key: Vec<u8>,
        /// Value.
        value: Vec<u8>,
    },
    /// Delete a key.
    Delete {
        /// Key.
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Receives events after the corresponding state has been committed.
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: RelayEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: RelayEvent) {
        (**self).emit(event)
    }
}

/// Storage a handler sees while executing one inbound call.
///
/// Reads return committed state overlaid with the writes staged so far in
/// this call. Writes are only staged: the manager commits them in the same
/// batch that marks the message executed, and drops them if the handler does
/// not return `Ok(true)`.
///
/// Keys are confined to the contract's own namespace
/// ([`KeyPrefix::ContractState`]).
pub struct ContractStorage<'a> {
    contract: Hash20,
    committed: &'a dyn KeyValueStore,
    staged: Vec<BatchOperation>,
}

impl<'a> ContractStorage<'a> {
    /// Empty staging area for `contract` over `committed`.
    pub fn new(contract: Hash20, committed: &'a dyn KeyValueStore) -> Self {
        Self {
            contract,
            committed,
            staged: Vec::new(),
        }
    }

    /// Contract the storage belongs to.
    pub fn contract(&self) -> Hash20 {
        self.contract
    }

    /// Read `key`, seeing this call's own staged writes.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let full = KeyPrefix::contract_key(&self.contract, key);
        for op in self.staged.iter().rev() {
            match op {
                BatchOperation::Put { key, value } if *key == full => {
                    return Ok(Some(value.clone()))
                }
                BatchOperation::Delete { key } if *key == full => return Ok(None),
                _ => {}
            }
        }
        self.committed.get(&full)
    }

    /// Stage a write of `value` at `key`.
    pub fn put(&mut self, key: &[u8], value: impl Into<Vec<u8>>) {
        let full = KeyPrefix::contract_key(&self.contract, key);
        self.staged.push(BatchOperation::put(full, value));
    }

    /// Stage a delete of `key`.
    pub fn delete(&mut self, key: &[u8]) {
        let full = KeyPrefix::contract_key(&self.contract, key);
        self.staged.push(BatchOperation::delete(full));
    }

    /// Number of staged operations.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Staged operations, fully keyed, in write order.
    pub fn into_operations(self) -> Vec<BatchOperation> {
        self.staged
    }
}

impl fmt::Debug for ContractStorage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractStorage")
            .field("contract", &self.contract)
            .field("staged", &self.staged)
            .finish()
    }
}

/// A local contract that accepts verified inbound messages.
///
/// Only `Ok(true)` counts as delivery. `Ok(false)` and `Err` leave the
/// message retryable. State changes must go through `storage`; anything a
/// handler mutates elsewhere is not rolled back when the commit fails.
pub trait CrossChainHandler: Send + Sync {
    /// Execute `call`, staging state changes in `storage`.
    fn handle(
        &self,
        call: &InboundCall,
        storage: &mut ContractStorage<'_>,
    ) -> Result<bool, DispatchError>;
}

impl<T: CrossChainHandler + ?Sized> CrossChainHandler for Arc<T> {
    fn handle(
        &self,
        call: &InboundCall,
        storage: &mut ContractStorage<'_>,
    ) -> Result<bool, DispatchError> {
        (**self).handle(call, storage)
    }
}
