//! Source port for marketplace listing feeds.
//!
//! Each marketplace is one [`SourceAdapter`]. Adapters own pagination,
//! cursors and wire formats; they hand back a complete, normalized snapshot
//! per call. The engine iterates a [`SourceRegistry`] and never branches on
//! which marketplace it is talking to.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{AppId, Currency, MarketSource, RawListing};
use crate::error::Result;

/// A marketplace listing feed.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Name the source is recorded under in `buy_prices`.
    fn source(&self) -> &MarketSource;

    /// Currency every listing of this source is quoted in.
    fn currency(&self) -> &Currency;

    /// Fetch every current listing for an app.
    ///
    /// An `Err` means the snapshot is unusable for this cycle; the engine
    /// then leaves the source's existing entries untouched.
    async fn fetch_listings(&self, app_id: AppId) -> Result<Vec<RawListing>>;
}

/// A registered source together with its deployment constants.
#[derive(Clone)]
pub struct RegisteredSource {
    pub adapter: Arc<dyn SourceAdapter>,
    /// Store discount or normalisation factor applied to its prices.
    pub price_multiplier: Decimal,
}

/// Registry of source adapters taking part in price batches.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<RegisteredSource>,
}

impl SourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { sources: vec![] }
    }

    /// Register a source with no price adjustment.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.register_with_multiplier(adapter, Decimal::ONE);
    }

    /// Register a source whose prices are scaled by `price_multiplier`.
    pub fn register_with_multiplier(&mut self, adapter: Arc<dyn SourceAdapter>, price_multiplier: Decimal) {
        self.sources.push(RegisteredSource {
            adapter,
            price_multiplier,
        });
    }

    /// Iterate the registered sources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSource> {
        self.sources.iter()
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
