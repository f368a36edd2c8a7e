//! Periodic snapshot batch.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::persist;
use crate::application::snapshot::SnapshotMaintainer;
use crate::domain::AppId;
use crate::error::Result;
use crate::port::ItemStore;

/// Shifts every item's snapshot buffers once.
///
/// The caller guarantees one run per item per period.
pub struct SnapshotSync<S> {
    store: Arc<S>,
    maintainer: SnapshotMaintainer,
}

impl<S: ItemStore> SnapshotSync<S> {
    #[must_use]
    pub fn new(store: Arc<S>, capacity: usize) -> Self {
        Self {
            store,
            maintainer: SnapshotMaintainer::new(capacity),
        }
    }

    /// Shift all items of `app_id` and save them.
    ///
    /// Returns the number of items saved.
    ///
    /// # Errors
    ///
    /// Fails only when the store fails.
    pub async fn run(&self, app_id: AppId) -> Result<usize> {
        let span = info_span!("shift_batch", batch_id = %Uuid::new_v4(), %app_id);
        self.shift_all(app_id).instrument(span).await
    }

    async fn shift_all(&self, app_id: AppId) -> Result<usize> {
        let mut items = self.store.load_items(app_id).await?;
        for item in &mut items {
            self.maintainer.shift(item);
        }
        let saved = persist(self.store.as_ref(), &mut items).await?;
        info!(saved, capacity = self.maintainer.capacity(), "Snapshots shifted");
        Ok(saved)
    }
}
