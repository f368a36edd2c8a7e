//! Engine configuration shared by the batch services.

use serde::Deserialize;

use crate::application::snapshot::DEFAULT_SNAPSHOT_CAPACITY;
use crate::domain::Currency;

/// Configuration for reconciliation and history batches.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Currency every exchange multiplier is relative to.
    #[serde(default = "Currency::usd")]
    pub pivot_currency: Currency,
    /// Periods kept in each rolling snapshot buffer.
    #[serde(default = "default_snapshot_capacity")]
    pub snapshot_capacity: usize,
    /// Upper bound on concurrent adapter fetches within one batch.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Trailing windows, in hours, for sales aggregates.
    #[serde(default = "default_sales_windows_hours")]
    pub sales_windows_hours: Vec<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pivot_currency: Currency::usd(),
            snapshot_capacity: default_snapshot_capacity(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            sales_windows_hours: default_sales_windows_hours(),
        }
    }
}

const fn default_snapshot_capacity() -> usize {
    DEFAULT_SNAPSHOT_CAPACITY
}

fn default_max_concurrent_fetches() -> usize {
    num_cpus::get().max(1)
}

fn default_sales_windows_hours() -> Vec<u32> {
    vec![1, 24, 168]
}
