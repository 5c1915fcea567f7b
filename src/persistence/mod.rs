//! Entry flag persistence
//!
//! One key in the injected key-value store holds the literal `"true"` once the
//! visitor has passed the gate. Nothing in this crate ever clears it.

use crate::platform::KeyValueStore;

/// Stored value meaning "already entered"
pub const ENTERED: &str = "true";

/// View of the entry flag in a store
pub struct EntryFlag<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> EntryFlag<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// Unavailable storage reads as "not yet entered"
    pub fn is_set(&self) -> bool {
        self.store.get(self.key).as_deref() == Some(ENTERED)
    }

    pub fn mark(&self) {
        self.store.set(self.key, ENTERED);
        log::info!("Entry flag saved ({})", self.key);
    }
}
