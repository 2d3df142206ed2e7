use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{ItemStore, StoreError, UpdateInstruction};
use crate::model::Item;

/// In-process item store.
///
/// Items are kept in id order, which is also the scan order. Every call takes
/// the lock once, so the existence check of `update` is atomic with the
/// write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `items`.
    ///
    /// Items without a string `id` are rejected.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Result<Self, StoreError> {
        let mut map = BTreeMap::new();
        for item in items {
            let id = key_of(&item)?;
            map.insert(id, item);
        }
        Ok(Self {
            items: RwLock::new(map),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

fn key_of(item: &Item) -> Result<String, StoreError> {
    match item.id() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(StoreError::Codec("item has no string id".to_string())),
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        let id = key_of(item)?;
        self.items.write().insert(id, item.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().get(id).cloned())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let removed = self.items.write().remove(id).is_some();
        debug!(id = %id, removed, "memory store delete");
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        instruction: &UpdateInstruction,
    ) -> Result<Item, StoreError> {
        let mut items = self.items.write();
        let Some(item) = items.get_mut(id) else {
            return Err(StoreError::ConditionFailed);
        };
        for (field, value) in instruction.assignments() {
            item.insert(field, value.clone());
        }
        Ok(item.clone())
    }
}
