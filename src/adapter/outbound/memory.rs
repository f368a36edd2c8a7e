//! In-memory item store, used by tests and dry runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::domain::{AppId, CanonicalItem, ItemKey};
use crate::error::Result;
use crate::port::ItemStore;

/// In-memory store keyed by app and item key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<AppId, BTreeMap<ItemKey, CanonicalItem>>>,
    batches: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `items`.
    #[must_use]
    pub fn with_items(items: impl IntoIterator<Item = CanonicalItem>) -> Self {
        let store = Self::new();
        {
            let mut map = store.items.write();
            for item in items {
                map.entry(item.app_id).or_default().insert(item.key.clone(), item);
            }
        }
        store
    }

    /// Current stored copy of an item.
    #[must_use]
    pub fn get(&self, app_id: AppId, key: &ItemKey) -> Option<CanonicalItem> {
        self.items.read().get(&app_id).and_then(|items| items.get(key)).cloned()
    }

    /// Number of `save_batch` calls received so far.
    #[must_use]
    pub fn batches_saved(&self) -> usize {
        self.batches.load(Ordering::Relaxed)
    }
}

impl ItemStore for MemoryStore {
    async fn load_items(&self, app_id: AppId) -> Result<Vec<CanonicalItem>> {
        Ok(self
            .items
            .read()
            .get(&app_id)
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_batch(&self, items: &[CanonicalItem]) -> Result<()> {
        let mut map = self.items.write();
        for item in items {
            let mut stored = item.clone();
            stored.mark_clean();
            map.entry(item.app_id).or_default().insert(item.key.clone(), stored);
        }
        self.batches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
