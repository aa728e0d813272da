//! Local persistence for the cookbook and the shopping list.
//!
//! Each collection lives in its own named slot as a JSON array. Slots are read
//! once at start-up and rewritten whenever the collection changes. Missing or
//! corrupt data loads as an empty collection.

mod file;
mod memory;

pub use file::{FileStore, StoreConfig};
pub use memory::MemoryStore;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// The two independent storage slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Cookbook,
    ShoppingList,
}

impl Slot {
    pub const ALL: &'static [Slot] = &[Slot::Cookbook, Slot::ShoppingList];

    /// Fixed storage key for the slot.
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Cookbook => "littlechef_cookbook",
            Slot::ShoppingList => "littlechef_shopping",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Durable string key-value storage local to this client.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read the raw value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the raw value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load a collection from a slot. Absent, unreadable or corrupt data is empty.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, slot: Slot) -> Vec<T> {
    let raw = match store.get(slot.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(slot = %slot, error = %e, "Failed to read stored collection");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(
                slot = %slot,
                error = %e,
                "Stored collection is corrupt, starting empty"
            );
            Vec::new()
        }
    }
}

/// Write a collection to a slot, replacing what was there.
pub fn save<T: Serialize>(
    store: &dyn KeyValueStore,
    slot: Slot,
    items: &[T],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(items)?;
    store.set(slot.key(), &json)?;
    tracing::debug!(slot = %slot, items = items.len(), "Collection saved");
    Ok(())
}
