//! Exchange rate port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Currency, ExchangeRate};
use crate::error::Result;

/// Source of exchange multipliers relative to the pivot currency.
///
/// The engine reads the provider once per batch and converts against that
/// snapshot; nothing is looked up while items are being reconciled.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Every recorded historical rate, in any order.
    async fn rate_history(&self) -> Result<Vec<ExchangeRate>>;

    /// Current live multiplier per currency.
    async fn live_rates(&self) -> Result<Vec<(Currency, Decimal)>>;
}
