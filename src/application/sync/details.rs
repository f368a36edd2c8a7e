//! Detail batches: order books and sales history per item.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::config::EngineConfig;
use super::{load_converter, persist};
use crate::application::currency::CurrencyConverter;
use crate::application::orderbook::apply_order_book;
use crate::application::sales::recalculate;
use crate::application::summary::{DetailReport, DetailSummary, ItemFailure};
use crate::domain::{AppId, CanonicalItem, ItemKey, OrderGraph, SalesGraph};
use crate::error::Result;
use crate::port::{ExchangeRateProvider, GraphAdapter, ItemStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailKind {
    Orders,
    Sales,
}

enum Payload {
    Orders(OrderGraph),
    Sales(SalesGraph),
}

/// Runs order-book and sales-history batches.
pub struct DetailSync<S> {
    graphs: Arc<dyn GraphAdapter>,
    rates: Arc<dyn ExchangeRateProvider>,
    store: Arc<S>,
    config: EngineConfig,
}

impl<S: ItemStore> DetailSync<S> {
    #[must_use]
    pub fn new(
        graphs: Arc<dyn GraphAdapter>,
        rates: Arc<dyn ExchangeRateProvider>,
        store: Arc<S>,
        config: EngineConfig,
    ) -> Self {
        Self {
            graphs,
            rates,
            store,
            config,
        }
    }

    /// Rebuild every item's order book from its depth histogram.
    ///
    /// # Errors
    ///
    /// Batch-fatal conditions only; per-item failures land in the summary.
    pub async fn order_books(&self, app_id: AppId, now: DateTime<Utc>) -> Result<DetailSummary> {
        let span = info_span!("order_batch", batch_id = %Uuid::new_v4(), %app_id);
        self.run(DetailKind::Orders, app_id, now).instrument(span).await
    }

    /// Merge every item's sales graph into its history.
    ///
    /// # Errors
    ///
    /// Batch-fatal conditions only; per-item failures land in the summary.
    pub async fn sales(&self, app_id: AppId, now: DateTime<Utc>) -> Result<DetailSummary> {
        let span = info_span!("sales_batch", batch_id = %Uuid::new_v4(), %app_id);
        self.run(DetailKind::Sales, app_id, now).instrument(span).await
    }

    async fn run(&self, kind: DetailKind, app_id: AppId, now: DateTime<Utc>) -> Result<DetailSummary> {
        let converter = load_converter(self.rates.as_ref(), &self.config.pivot_currency, now).await?;
        let mut items = self.store.load_items(app_id).await?;
        info!(items = items.len(), ?kind, "Starting detail batch");

        // All graph I/O completes before any item is touched.
        let keys: Vec<ItemKey> = items.iter().map(|item| item.key.clone()).collect();
        let fetched: Vec<Result<Payload>> = stream::iter(keys.iter())
            .map(|key| self.fetch(kind, app_id, key))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let mut summary = DetailSummary::default();
        for (item, payload) in items.iter_mut().zip(fetched) {
            let outcome = match payload {
                Ok(payload) => self.apply(item, payload, &converter, now),
                Err(err) => Err(err),
            };
            match outcome {
                Ok(report) => summary.record(&report),
                Err(err) => {
                    warn!(%app_id, item = %item.key, error = %err, "Detail update failed");
                    summary.failures.push(ItemFailure::new(item.key.clone(), err));
                }
            }
        }

        summary.saved = persist(self.store.as_ref(), &mut items).await?;
        info!(
            updated = summary.updated,
            anomalous = summary.anomalous,
            failures = summary.failures.len(),
            saved = summary.saved,
            "Detail batch complete"
        );
        Ok(summary)
    }

    async fn fetch(&self, kind: DetailKind, app_id: AppId, key: &ItemKey) -> Result<Payload> {
        match kind {
            DetailKind::Orders => self.graphs.order_graph(app_id, key).await.map(Payload::Orders),
            DetailKind::Sales => self.graphs.sales_graph(app_id, key).await.map(Payload::Sales),
        }
    }

    fn apply(
        &self,
        item: &mut CanonicalItem,
        payload: Payload,
        converter: &CurrencyConverter,
        now: DateTime<Utc>,
    ) -> Result<DetailReport> {
        match payload {
            Payload::Orders(graph) => {
                let anomalies = apply_order_book(item, &graph, converter, now)?;
                if !anomalies.is_clean() {
                    warn!(
                        item = %item.key,
                        clamped = anomalies.clamped,
                        malformed = anomalies.malformed,
                        out_of_order = anomalies.out_of_order,
                        "Order histogram data-quality issue"
                    );
                }
                Ok(DetailReport::Orders(anomalies))
            }
            Payload::Sales(graph) => {
                let merge = recalculate(item, &graph, converter, &self.config.sales_windows_hours, now)?;
                Ok(DetailReport::Sales(merge))
            }
        }
    }
}
