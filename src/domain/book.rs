//! Order book types for market depth representation.
//!
//! An item's order book has two sides:
//! - **Sell orders**: sorted by price ascending (cheapest first)
//! - **Buy orders**: sorted by price descending (highest bid first)
//!
//! Every [`OrderLevel`] carries the discrete quantity at exactly its price,
//! never a running total.
//!
//! # Examples
//!
//! ```
//! use pricesync::domain::book::{OrderLevel, total_quantity};
//!
//! let sells = vec![OrderLevel::new(100, 5), OrderLevel::new(110, 7)];
//! assert_eq!(total_quantity(&sells), 12);
//! ```

use serde::{Deserialize, Serialize};

use super::money::{MinorUnits, Quantity};

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLevel {
    /// Price in minor units.
    pub price: MinorUnits,
    /// Quantity available at exactly this price.
    pub quantity: Quantity,
}

impl OrderLevel {
    /// Creates a new price level.
    #[must_use]
    pub const fn new(price: MinorUnits, quantity: Quantity) -> Self {
        Self { price, quantity }
    }
}

/// Side of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Sell orders, best (lowest) price first.
    Sell,
    /// Buy orders, best (highest) price first.
    Buy,
}

impl BookSide {
    /// True when `next` may follow `prev` on this side without breaking the
    /// strict price ordering.
    #[must_use]
    pub const fn is_ordered(self, prev: MinorUnits, next: MinorUnits) -> bool {
        match self {
            Self::Sell => next > prev,
            Self::Buy => next < prev,
        }
    }
}

/// Sum of quantities across levels.
#[must_use]
pub fn total_quantity(levels: &[OrderLevel]) -> Quantity {
    levels.iter().map(|level| level.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_order_prices_in_opposite_directions() {
        assert!(BookSide::Sell.is_ordered(100, 110));
        assert!(!BookSide::Sell.is_ordered(110, 110));
        assert!(BookSide::Buy.is_ordered(110, 100));
        assert!(!BookSide::Buy.is_ordered(100, 110));
    }
}
