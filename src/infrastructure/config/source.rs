//! Listing source configuration.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Currency, MarketSource};

/// One `[[sources]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Name recorded in every item's buy prices.
    pub name: String,
    /// Currency the source quotes its listings in.
    pub currency: Currency,
    /// Path of the JSON listing feed.
    pub feed: PathBuf,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Store discount or normalisation factor applied to grouped prices.
    #[serde(default = "default_price_multiplier")]
    pub price_multiplier: Decimal,
}

impl SourceConfig {
    #[must_use]
    pub fn market_source(&self) -> MarketSource {
        MarketSource::new(self.name.trim())
    }
}

const fn default_enabled() -> bool {
    true
}

const fn default_price_multiplier() -> Decimal {
    Decimal::ONE
}
