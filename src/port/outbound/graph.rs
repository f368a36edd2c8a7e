//! Graph port for order-depth histograms and sales graphs.

use async_trait::async_trait;

use crate::domain::{AppId, ItemKey, OrderGraph, SalesGraph};
use crate::error::Result;

/// Supplies per-item graph payloads already parsed from marketplace formats.
#[async_trait]
pub trait GraphAdapter: Send + Sync {
    /// Cumulative depth histogram for both sides of an item's book.
    async fn order_graph(&self, app_id: AppId, key: &ItemKey) -> Result<OrderGraph>;

    /// Trailing sales window for an item.
    async fn sales_graph(&self, app_id: AppId, key: &ItemKey) -> Result<SalesGraph>;
}
