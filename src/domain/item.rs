//! The canonical per-item record every source is reconciled into.
//!
//! A [`CanonicalItem`] is owned by one reconciliation call at a time. The
//! engine mutates it in memory and flags it dirty; persisting it is the
//! caller's business.
//!
//! # Examples
//!
//! ```
//! use pricesync::domain::{AppId, CanonicalItem, Currency, ItemKey, MarketSource, PriceWithSupply};
//!
//! let mut item = CanonicalItem::new(AppId::new(730), ItemKey::new("Case Key"), Currency::new("USD").unwrap());
//! item.buy_prices.insert(MarketSource::new("skinport"), PriceWithSupply::new(240, Some(12)));
//! item.buy_prices.insert(MarketSource::new("steam"), PriceWithSupply::new(249, None));
//!
//! let (source, best) = item.cheapest_buy_price().unwrap();
//! assert_eq!(source.as_str(), "skinport");
//! assert_eq!(best.price, 240);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::OrderLevel;
use super::currency::Currency;
use super::id::{AppId, ItemKey, MarketSource};
use super::money::{MinorUnits, Quantity};
use super::sale::{SaleRecord, SalesAggregates};

/// A source's best price and total depth for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWithSupply {
    /// Price in minor units of the item's currency.
    pub price: MinorUnits,
    /// Total quantity on offer, `None` when the source does not publish it.
    pub supply: Option<Quantity>,
}

impl PriceWithSupply {
    #[must_use]
    pub const fn new(price: MinorUnits, supply: Option<Quantity>) -> Self {
        Self { price, supply }
    }
}

/// Newest-first ring buffers of periodic "stable" snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHistory {
    #[serde(default)]
    pub buy_order_highest: Vec<Option<MinorUnits>>,
    #[serde(default)]
    pub sell_order_lowest: Vec<Option<MinorUnits>>,
    #[serde(default)]
    pub last_sale_value: Vec<Option<MinorUnits>>,
}

/// The single reconciled record for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalItem {
    pub app_id: AppId,
    pub key: ItemKey,
    /// Native currency every price on this record is expressed in.
    pub currency: Currency,

    /// Only sources that reported the item in their latest successful feed.
    #[serde(default)]
    pub buy_prices: BTreeMap<MarketSource, PriceWithSupply>,

    #[serde(default)]
    pub sell_order_lowest_price: Option<MinorUnits>,
    #[serde(default)]
    pub buy_order_highest_price: Option<MinorUnits>,
    #[serde(default)]
    pub sell_order_count: Quantity,
    #[serde(default)]
    pub buy_order_count: Quantity,
    /// Price ascending.
    #[serde(default)]
    pub sell_orders: Vec<OrderLevel>,
    /// Price descending.
    #[serde(default)]
    pub buy_orders: Vec<OrderLevel>,

    /// Time ordered, no duplicate timestamps.
    #[serde(default)]
    pub sales_history: Vec<SaleRecord>,
    #[serde(default)]
    pub sales: SalesAggregates,

    #[serde(default)]
    pub snapshots: SnapshotHistory,

    #[serde(default)]
    pub last_checked_orders_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_checked_sales_on: Option<DateTime<Utc>>,

    #[serde(skip)]
    dirty: bool,
}

impl CanonicalItem {
    /// Create an empty record.
    #[must_use]
    pub fn new(app_id: AppId, key: ItemKey, currency: Currency) -> Self {
        Self {
            app_id,
            key,
            currency,
            buy_prices: BTreeMap::new(),
            sell_order_lowest_price: None,
            buy_order_highest_price: None,
            sell_order_count: 0,
            buy_order_count: 0,
            sell_orders: Vec::new(),
            buy_orders: Vec::new(),
            sales_history: Vec::new(),
            sales: SalesAggregates::default(),
            snapshots: SnapshotHistory::default(),
            last_checked_orders_on: None,
            last_checked_sales_on: None,
            dirty: false,
        }
    }

    /// True once anything on the record changed since it was loaded.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Reset the flag after the record has been persisted.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// The lowest positive buy price across all sources.
    ///
    /// Ties resolve to the source that sorts first by name.
    #[must_use]
    pub fn cheapest_buy_price(&self) -> Option<(&MarketSource, &PriceWithSupply)> {
        self.buy_prices
            .iter()
            .filter(|(_, entry)| entry.price > 0)
            .min_by_key(|(_, entry)| entry.price)
    }

    /// Value of the most recent recorded sale.
    #[must_use]
    pub fn last_sale_value(&self) -> Option<MinorUnits> {
        self.sales_history.last().map(|sale| sale.median_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CanonicalItem {
        CanonicalItem::new(
            AppId::new(730),
            ItemKey::new("Operation Breakout Weapon Case"),
            Currency::new("USD").unwrap(),
        )
    }

    #[test]
    fn cheapest_buy_price_ignores_zero_prices() {
        let mut item = item();
        item.buy_prices
            .insert(MarketSource::new("a"), PriceWithSupply::new(0, Some(0)));
        item.buy_prices
            .insert(MarketSource::new("b"), PriceWithSupply::new(120, Some(4)));
        item.buy_prices
            .insert(MarketSource::new("c"), PriceWithSupply::new(150, None));

        let (source, entry) = item.cheapest_buy_price().unwrap();
        assert_eq!(source.as_str(), "b");
        assert_eq!(entry.price, 120);
    }

    #[test]
    fn cheapest_buy_price_is_none_without_entries() {
        assert!(item().cheapest_buy_price().is_none());
    }

    #[test]
    fn dirty_flag_is_not_serialized() {
        let mut item = item();
        item.mark_dirty();
        let json = serde_json::to_string(&item).unwrap();
        let restored: CanonicalItem = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_dirty());
        assert_eq!(restored.key, item.key);
    }
}
