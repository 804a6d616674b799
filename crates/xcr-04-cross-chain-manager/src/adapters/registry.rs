//! Address-keyed handler registry.

use crate::ports::outbound::CrossChainHandler;
use shared_types::Hash20;
use std::collections::HashMap;
use std::fmt;

/// Local handlers the manager can dispatch to, keyed by 20-byte address.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Hash20, Box<dyn CrossChainHandler>>,
}

impl HandlerRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` at `address`, returning any handler it replaces.
    pub fn register(
        &mut self,
        address: Hash20,
        handler: impl CrossChainHandler + 'static,
    ) -> Option<Box<dyn CrossChainHandler>> {
        self.handlers.insert(address, Box::new(handler))
    }

    /// Remove the handler at `address`.
    pub fn unregister(&mut self, address: &Hash20) -> Option<Box<dyn CrossChainHandler>> {
        self.handlers.remove(address)
    }

    /// Handler at `address`.
    pub fn resolve(&self, address: &Hash20) -> Option<&dyn CrossChainHandler> {
        self.handlers.get(address).map(|h| h.as_ref())
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut addresses: Vec<_> = self.handlers.keys().collect();
        addresses.sort();
        f.debug_struct("HandlerRegistry")
            .field("addresses", &addresses)
            .finish()
    }
}
