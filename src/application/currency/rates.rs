//! Point-in-time snapshot of exchange rates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Currency, ExchangeRate};

/// Rate history plus live multipliers, all relative to one pivot currency.
///
/// Built once per batch from the rate provider and then only read.
#[derive(Debug, Clone, Default)]
pub struct RateBook {
    /// Per-currency history, oldest first.
    history: HashMap<Currency, Vec<ExchangeRate>>,
    live: HashMap<Currency, Decimal>,
}

impl RateBook {
    /// Create an empty rate book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rate book from provider output in any order.
    #[must_use]
    pub fn from_parts(
        history: impl IntoIterator<Item = ExchangeRate>,
        live: impl IntoIterator<Item = (Currency, Decimal)>,
    ) -> Self {
        let mut book = Self::new();
        for rate in history {
            book.record(rate);
        }
        for (currency, multiplier) in live {
            book.set_live(currency, multiplier);
        }
        book
    }

    /// Append a historical observation, keeping the history time ordered.
    pub fn record(&mut self, rate: ExchangeRate) {
        let entries = self.history.entry(rate.currency.clone()).or_default();
        let at = entries.partition_point(|existing| existing.timestamp <= rate.timestamp);
        entries.insert(at, rate);
    }

    /// Set the current live multiplier for a currency.
    pub fn set_live(&mut self, currency: Currency, multiplier: Decimal) {
        self.live.insert(currency, multiplier);
    }

    /// Resolve the multiplier for `currency` as of `as_of`.
    ///
    /// Uses the latest historical rate not after `as_of`; falls back to the
    /// live multiplier when no such rate exists.
    #[must_use]
    pub fn get_rate(&self, currency: &Currency, as_of: DateTime<Utc>) -> Option<Decimal> {
        let historical = self.history.get(currency).and_then(|entries| {
            let at = entries.partition_point(|rate| rate.timestamp <= as_of);
            at.checked_sub(1).map(|idx| entries[idx].multiplier)
        });
        historical.or_else(|| self.live.get(currency).copied())
    }

    /// Number of currencies with either history or a live rate.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history
            .keys()
            .chain(self.live.keys().filter(|c| !self.history.contains_key(*c)))
            .count()
    }

    /// Returns true if the book knows no currency at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.live.is_empty()
    }
}
