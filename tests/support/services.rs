//! Batch services wired to in-memory and scripted adapters.

use std::sync::Arc;

use pricesync::adapter::outbound::memory::MemoryStore;
use pricesync::application::sync::{DetailSync, EngineConfig, PriceSync};
use pricesync::domain::CanonicalItem;
use pricesync::port::{ExchangeRateProvider, SourceAdapter, SourceRegistry};
use pricesync::testkit::adapter::{StaticGraphs, StaticRates};

pub fn engine() -> EngineConfig {
    EngineConfig {
        max_concurrent_fetches: 2,
        ..EngineConfig::default()
    }
}

pub fn store_with(items: Vec<CanonicalItem>) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_items(items))
}

pub fn price_sync(
    sources: Vec<Arc<dyn SourceAdapter>>,
    rates: StaticRates,
    store: &Arc<MemoryStore>,
) -> PriceSync<MemoryStore> {
    let mut registry = SourceRegistry::new();
    for source in sources {
        registry.register(source);
    }
    let rates: Arc<dyn ExchangeRateProvider> = Arc::new(rates);
    PriceSync::new(registry, rates, Arc::clone(store), engine())
}

pub fn detail_sync(graphs: StaticGraphs, rates: StaticRates, store: &Arc<MemoryStore>) -> DetailSync<MemoryStore> {
    DetailSync::new(Arc::new(graphs), Arc::new(rates), Arc::clone(store), engine())
}
