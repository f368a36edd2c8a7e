//! Exchange rate table read from a JSON file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::read_json;
use crate::domain::{Currency, ExchangeRate};
use crate::error::Result;
use crate::port::ExchangeRateProvider;

#[derive(Debug, Default, Deserialize)]
struct RateTable {
    #[serde(default)]
    history: Vec<ExchangeRate>,
    #[serde(default)]
    live: BTreeMap<Currency, Decimal>,
}

#[derive(Debug, Clone)]
pub struct JsonRates {
    path: PathBuf,
}

impl JsonRates {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ExchangeRateProvider for JsonRates {
    async fn rate_history(&self) -> Result<Vec<ExchangeRate>> {
        let table: RateTable = read_json(&self.path).await?;
        Ok(table.history)
    }

    async fn live_rates(&self) -> Result<Vec<(Currency, Decimal)>> {
        let table: RateTable = read_json(&self.path).await?;
        Ok(table.live.into_iter().collect())
    }
}
