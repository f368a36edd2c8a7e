//! Batch outcome types.
//!
//! Recoverable failures are data: every per-item and per-source problem ends
//! up in one of these records and the batch carries on.

use serde::Serialize;
use uuid::Uuid;

use super::orderbook::GraphAnomalies;
use super::sales::MergeReport;
use crate::domain::{AppId, ItemKey, MarketSource};

/// A single item whose update was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub key: ItemKey,
    pub error: String,
}

impl ItemFailure {
    pub fn new(key: ItemKey, error: impl ToString) -> Self {
        Self {
            key,
            error: error.to_string(),
        }
    }
}

/// A listing skipped as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedListing {
    pub key: ItemKey,
    pub reason: String,
}

/// What reconciling one source's feed did to the canonical item set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Listing keys with no canonical item to attach to.
    pub unmatched: usize,
    pub rejected: Vec<RejectedListing>,
    pub failures: Vec<ItemFailure>,
}

impl SourceReport {
    /// Number of items whose entry for this source changed.
    #[must_use]
    pub const fn changed(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

/// Per-source result inside a price batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// The feed was fetched and reconciled.
    Reconciled {
        source: MarketSource,
        report: SourceReport,
    },
    /// The fetch failed; existing entries for the source were preserved.
    FetchFailed { source: MarketSource, error: String },
}

impl SourceOutcome {
    #[must_use]
    pub const fn source(&self) -> &MarketSource {
        match self {
            Self::Reconciled { source, .. } | Self::FetchFailed { source, .. } => source,
        }
    }

    #[must_use]
    pub const fn is_reconciled(&self) -> bool {
        matches!(self, Self::Reconciled { .. })
    }
}

/// Outcome of one price reconciliation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub app_id: AppId,
    pub items: usize,
    /// Items handed to the store at the end of the batch.
    pub saved: usize,
    pub sources: Vec<SourceOutcome>,
}

impl BatchSummary {
    /// Outcome for a given source, if it took part.
    #[must_use]
    pub fn source(&self, source: &MarketSource) -> Option<&SourceOutcome> {
        self.sources.iter().find(|outcome| outcome.source() == source)
    }

    /// Sources whose fetch failed.
    #[must_use]
    pub fn failed_sources(&self) -> Vec<&MarketSource> {
        self.sources
            .iter()
            .filter(|outcome| matches!(outcome, SourceOutcome::FetchFailed { .. }))
            .map(SourceOutcome::source)
            .collect()
    }
}

/// Per-item detail update result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DetailReport {
    Orders(GraphAnomalies),
    Sales(MergeReport),
}

/// Outcome of an order-book or sales detail batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailSummary {
    pub updated: usize,
    /// Items whose histogram needed clamping or skipped rows.
    pub anomalous: usize,
    /// New sale records across all items.
    pub inserted_sales: usize,
    pub saved: usize,
    pub failures: Vec<ItemFailure>,
}

impl DetailSummary {
    pub(crate) fn record(&mut self, report: &DetailReport) {
        self.updated += 1;
        match report {
            DetailReport::Orders(anomalies) => {
                if !anomalies.is_clean() {
                    self.anomalous += 1;
                }
            }
            DetailReport::Sales(merge) => {
                self.inserted_sales += merge.inserted;
                if merge.malformed > 0 {
                    self.anomalous += 1;
                }
            }
        }
    }
}
