//! Price batch: every registered source against an app's canonical items.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use parking_lot::Mutex;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::config::EngineConfig;
use super::{load_converter, persist};
use crate::application::reconcile::{PriceReconciler, SourcePricing};
use crate::application::summary::{BatchSummary, SourceOutcome};
use crate::domain::{AppId, CanonicalItem};
use crate::error::Result;
use crate::port::{ExchangeRateProvider, ItemStore, RegisteredSource, SourceRegistry};

/// Runs price reconciliation batches.
pub struct PriceSync<S> {
    sources: SourceRegistry,
    rates: Arc<dyn ExchangeRateProvider>,
    store: Arc<S>,
    config: EngineConfig,
}

impl<S: ItemStore> PriceSync<S> {
    #[must_use]
    pub fn new(
        sources: SourceRegistry,
        rates: Arc<dyn ExchangeRateProvider>,
        store: Arc<S>,
        config: EngineConfig,
    ) -> Self {
        Self {
            sources,
            rates,
            store,
            config,
        }
    }

    /// Run one batch for `app_id`.
    ///
    /// Sources are fetched concurrently; each completed feed is reconciled
    /// under the item-set lock, one source at a time. A failed fetch only
    /// affects its own source.
    ///
    /// # Errors
    ///
    /// Batch-fatal conditions only: the rate snapshot cannot be loaded or has
    /// no pivot, or the store fails to load or save.
    pub async fn run(&self, app_id: AppId, now: DateTime<Utc>) -> Result<BatchSummary> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("price_batch", %batch_id, %app_id);
        self.run_batch(batch_id, app_id, now).instrument(span).await
    }

    async fn run_batch(&self, batch_id: Uuid, app_id: AppId, now: DateTime<Utc>) -> Result<BatchSummary> {
        let converter = load_converter(self.rates.as_ref(), &self.config.pivot_currency, now).await?;
        let items = self.store.load_items(app_id).await?;
        let item_count = items.len();
        info!(items = item_count, sources = self.sources.len(), "Starting price batch");

        let items = Mutex::new(items);
        let reconciler = PriceReconciler::new(&converter, now);

        let sources: Vec<SourceOutcome> = stream::iter(self.sources.iter())
            .map(|registered| self.sync_source(app_id, registered, &items, &reconciler))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let mut items = items.into_inner();
        let saved = persist(self.store.as_ref(), &mut items).await?;

        let summary = BatchSummary {
            batch_id,
            app_id,
            items: item_count,
            saved,
            sources,
        };
        info!(
            saved,
            failed_sources = summary.failed_sources().len(),
            "Price batch complete"
        );
        Ok(summary)
    }

    async fn sync_source(
        &self,
        app_id: AppId,
        registered: &RegisteredSource,
        items: &Mutex<Vec<CanonicalItem>>,
        reconciler: &PriceReconciler<'_>,
    ) -> SourceOutcome {
        let adapter = &registered.adapter;
        let source = adapter.source().clone();

        let listings = match adapter.fetch_listings(app_id).await {
            Ok(listings) => listings,
            Err(err) => {
                warn!(%app_id, %source, error = %err, "Fetch failed, keeping existing prices");
                return SourceOutcome::FetchFailed {
                    source,
                    error: err.to_string(),
                };
            }
        };

        let pricing = SourcePricing::new(source.clone(), adapter.currency().clone())
            .with_multiplier(registered.price_multiplier);

        let report = {
            let mut items = items.lock();
            reconciler.reconcile_all(&mut items, &pricing, &listings)
        };

        info!(
            %app_id,
            %source,
            listings = listings.len(),
            changed = report.changed(),
            added = report.added,
            updated = report.updated,
            removed = report.removed,
            rejected = report.rejected.len(),
            failures = report.failures.len(),
            "Source reconciled"
        );
        SourceOutcome::Reconciled { source, report }
    }
}
