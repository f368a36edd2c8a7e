//! Scripted port implementations for testing.
//!
//! - [`ScriptedSource`] - pops one scripted listing snapshot or failure per
//!   fetch, then returns empty snapshots.
//! - [`StaticRates`] - fixed rate history and live table, optionally failing.
//! - [`StaticGraphs`] - graphs keyed by item; a missing key is a fetch error.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::domain::currency;
use crate::domain::{
    AppId, Currency, ExchangeRate, ItemKey, MarketSource, OrderGraph, RawListing, SalesGraph,
};
use crate::error::{Error, Result};
use crate::port::{ExchangeRateProvider, GraphAdapter, SourceAdapter};

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

pub struct ScriptedSource {
    source: MarketSource,
    currency: Currency,
    script: Mutex<VecDeque<std::result::Result<Vec<RawListing>, String>>>,
    calls: AtomicU32,
}

impl ScriptedSource {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            source: MarketSource::new(name),
            currency: currency(code),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// Queue a successful snapshot.
    pub fn then_listings(self, listings: Vec<RawListing>) -> Self {
        self.script.lock().push_back(Ok(listings));
        self
    }

    /// Queue a failed fetch.
    pub fn then_failure(self, reason: &str) -> Self {
        self.script.lock().push_back(Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for ScriptedSource {
    fn source(&self) -> &MarketSource {
        &self.source
    }

    fn currency(&self) -> &Currency {
        &self.currency
    }

    async fn fetch_listings(&self, _app_id: AppId) -> Result<Vec<RawListing>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().pop_front() {
            Some(Ok(listings)) => Ok(listings),
            Some(Err(reason)) => Err(Error::Fetch {
                market: self.source.clone(),
                reason,
            }),
            None => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// StaticRates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    history: Vec<ExchangeRate>,
    live: Vec<(Currency, Decimal)>,
    failing: bool,
}

impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// USD pivot with live EUR 0.9137 and CNY 7.2431.
    pub fn standard() -> Self {
        Self::new()
            .with_live("USD", dec!(1))
            .with_live("EUR", dec!(0.9137))
            .with_live("CNY", dec!(7.2431))
    }

    pub fn with_live(mut self, code: &str, multiplier: Decimal) -> Self {
        self.live.push((currency(code), multiplier));
        self
    }

    pub fn with_history(mut self, code: &str, timestamp: DateTime<Utc>, multiplier: Decimal) -> Self {
        self.history
            .push(ExchangeRate::new(currency(code), timestamp, multiplier));
        self
    }

    /// Every call fails, as an unreachable rate service would.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(Error::Parse("rate table unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ExchangeRateProvider for StaticRates {
    async fn rate_history(&self) -> Result<Vec<ExchangeRate>> {
        self.check()?;
        Ok(self.history.clone())
    }

    async fn live_rates(&self) -> Result<Vec<(Currency, Decimal)>> {
        self.check()?;
        Ok(self.live.clone())
    }
}

// ---------------------------------------------------------------------------
// StaticGraphs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StaticGraphs {
    orders: HashMap<ItemKey, OrderGraph>,
    sales: HashMap<ItemKey, SalesGraph>,
}

impl StaticGraphs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order graph from `(price, cumulative)` pairs.
    pub fn with_orders(mut self, key: &str, code: &str, sell: &[(&str, &str)], buy: &[(&str, &str)]) -> Self {
        let rows = |pairs: &[(&str, &str)]| -> Vec<[String; 2]> {
            pairs
                .iter()
                .map(|(price, qty)| [(*price).to_string(), (*qty).to_string()])
                .collect()
        };
        self.orders.insert(
            ItemKey::new(key),
            OrderGraph {
                currency: currency(code),
                sell: rows(sell),
                buy: rows(buy),
            },
        );
        self
    }

    pub fn with_sales(mut self, key: &str, graph: SalesGraph) -> Self {
        self.sales.insert(ItemKey::new(key), graph);
        self
    }
}

#[async_trait]
impl GraphAdapter for StaticGraphs {
    async fn order_graph(&self, _app_id: AppId, key: &ItemKey) -> Result<OrderGraph> {
        self.orders.get(key).cloned().ok_or_else(|| Error::Graph {
            key: key.clone(),
            reason: "no order graph".to_string(),
        })
    }

    async fn sales_graph(&self, _app_id: AppId, key: &ItemKey) -> Result<SalesGraph> {
        self.sales.get(key).cloned().ok_or_else(|| Error::Graph {
            key: key.clone(),
            reason: "no sales graph".to_string(),
        })
    }
}
