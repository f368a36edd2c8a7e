//! Persistence port for canonical items.

use std::future::Future;

use crate::domain::{AppId, CanonicalItem};
use crate::error::Result;

/// Storage operations for canonical items.
///
/// The engine never writes on its own: it loads an app's items, mutates them
/// in memory and hands the changed ones back in a single batch.
pub trait ItemStore: Send + Sync {
    /// Load every canonical item of an app.
    fn load_items(&self, app_id: AppId) -> impl Future<Output = Result<Vec<CanonicalItem>>> + Send;

    /// Persist a batch of items, replacing existing records by key.
    fn save_batch(&self, items: &[CanonicalItem]) -> impl Future<Output = Result<()>> + Send;
}
