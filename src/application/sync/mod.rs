//! Batch services driving the engine components.
//!
//! A batch is one synchronous pass over an app's canonical items, invoked by
//! an external scheduler. Each service loads its inputs, does all I/O up
//! front or outside the item lock, mutates items in memory and hands the
//! changed ones back to the store in a single `save_batch`.
//!
//! - [`PriceSync`] - fetch every registered source and reconcile buy prices
//! - [`DetailSync`] - rebuild order books or merge sales graphs per item
//! - [`SnapshotSync`] - shift the rolling snapshot buffers once per period

pub mod config;
mod details;
mod prices;
mod snapshots;

pub use config::EngineConfig;
pub use details::DetailSync;
pub use prices::PriceSync;
pub use snapshots::SnapshotSync;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::currency::{CurrencyConverter, RateBook};
use crate::domain::{CanonicalItem, Currency};
use crate::error::Result;
use crate::port::{ExchangeRateProvider, ItemStore};

/// Snapshot the provider's rates into a converter for one batch.
///
/// # Errors
///
/// Fails when the provider fails or the pivot has no rate; both leave
/// nothing that could be priced, so the batch must not start.
pub async fn load_converter(
    provider: &dyn ExchangeRateProvider,
    pivot: &Currency,
    now: DateTime<Utc>,
) -> Result<CurrencyConverter> {
    let history = provider.rate_history().await?;
    let live = provider.live_rates().await?;
    let rates = RateBook::from_parts(history, live);
    debug!(currencies = rates.len(), pivot = %pivot, "Loaded rate snapshot");
    Ok(CurrencyConverter::new(pivot.clone(), rates, now)?)
}

/// Save every dirty item in one batch, then reset their flags.
///
/// Returns the number of items saved.
pub(crate) async fn persist<S: ItemStore>(store: &S, items: &mut [CanonicalItem]) -> Result<usize> {
    let dirty: Vec<CanonicalItem> = items.iter().filter(|item| item.is_dirty()).cloned().collect();
    if dirty.is_empty() {
        return Ok(0);
    }

    store.save_batch(&dirty).await?;
    for item in items.iter_mut() {
        item.mark_clean();
    }
    Ok(dirty.len())
}
