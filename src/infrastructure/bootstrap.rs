//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::file::{JsonFeedSource, JsonGraphs, JsonItemStore, JsonRates};
use crate::application::sync::{DetailSync, PriceSync, SnapshotSync};
use crate::infrastructure::config::settings::Config;
use crate::port::{ExchangeRateProvider, GraphAdapter, SourceRegistry};

/// Build the source registry from every enabled `[[sources]]` entry.
#[must_use]
pub fn build_source_registry(config: &Config) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    for source in config.enabled_sources() {
        let adapter = JsonFeedSource::new(source.market_source(), source.currency.clone(), &source.feed);
        registry.register_with_multiplier(Arc::new(adapter), source.price_multiplier);
        info!(
            source = %source.market_source(),
            currency = %source.currency,
            multiplier = %source.price_multiplier,
            "Source registered"
        );
    }
    registry
}

/// Batch services wired to the file-backed adapters.
pub struct Services {
    pub prices: PriceSync<JsonItemStore>,
    pub details: DetailSync<JsonItemStore>,
    pub snapshots: SnapshotSync<JsonItemStore>,
    pub rates: Arc<dyn ExchangeRateProvider>,
}

impl Services {
    /// Wire every service from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(JsonItemStore::new(&config.store.path));
        let rates: Arc<dyn ExchangeRateProvider> = Arc::new(JsonRates::new(&config.rates.path));
        let graphs: Arc<dyn GraphAdapter> = Arc::new(JsonGraphs::new(&config.graphs.dir));

        Self {
            prices: PriceSync::new(
                build_source_registry(config),
                Arc::clone(&rates),
                Arc::clone(&store),
                config.engine.clone(),
            ),
            details: DetailSync::new(graphs, Arc::clone(&rates), Arc::clone(&store), config.engine.clone()),
            snapshots: SnapshotSync::new(store, config.engine.snapshot_capacity),
            rates,
        }
    }
}
