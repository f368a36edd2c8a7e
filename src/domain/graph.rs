//! Raw graph payloads supplied by histogram and sales adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::money::{MinorUnits, Quantity};

/// One row of a cumulative depth histogram: `(price, cumulative quantity)`.
///
/// Both cells are kept as text, exactly as the marketplace published them.
pub type GraphRow = [String; 2];

/// Cumulative order depth for both sides of an item's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderGraph {
    pub currency: Currency,
    /// Best (lowest) price first.
    #[serde(default)]
    pub sell: Vec<GraphRow>,
    /// Best (highest) price first.
    #[serde(default)]
    pub buy: Vec<GraphRow>,
}

/// One point of a sales graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleGraphPoint {
    pub timestamp: DateTime<Utc>,
    pub median_price: MinorUnits,
    pub quantity: Quantity,
}

impl SaleGraphPoint {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, median_price: MinorUnits, quantity: Quantity) -> Self {
        Self {
            timestamp,
            median_price,
            quantity,
        }
    }
}

/// A trailing sales window as published by a marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesGraph {
    pub currency: Currency,
    #[serde(default)]
    pub points: Vec<SaleGraphPoint>,
}
