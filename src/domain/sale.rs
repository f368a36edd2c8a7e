//! Sale history records and their rolling aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{MinorUnits, Quantity};

/// One aggregated sale observation from a sales graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub timestamp: DateTime<Utc>,
    pub median_price: MinorUnits,
    pub quantity: Quantity,
}

impl SaleRecord {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, median_price: MinorUnits, quantity: Quantity) -> Self {
        Self {
            timestamp,
            median_price,
            quantity,
        }
    }

    /// Total traded value of this record.
    #[must_use]
    pub const fn value(&self) -> MinorUnits {
        self.median_price.saturating_mul(self.quantity)
    }
}

/// Sale count and value over a trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Window length in hours.
    pub hours: u32,
    /// Items sold within the window.
    pub sales: Quantity,
    /// Total value sold within the window.
    pub value: MinorUnits,
}

/// Aggregates recomputed from the full sales history after every merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesAggregates {
    /// One entry per configured window, shortest first.
    pub windows: Vec<WindowStats>,
    pub last_sale_on: Option<DateTime<Utc>>,
    pub last_sale_value: Option<MinorUnits>,
    pub all_time_high: Option<MinorUnits>,
    pub all_time_low: Option<MinorUnits>,
    /// Quantity-weighted average sale price.
    pub all_time_average: Option<MinorUnits>,
}

impl SalesAggregates {
    /// Stats for the window of exactly `hours`, if it is tracked.
    #[must_use]
    pub fn window(&self, hours: u32) -> Option<&WindowStats> {
        self.windows.iter().find(|w| w.hours == hours)
    }
}
