use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{Currency, ItemKey, MarketSource};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Currency conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("no exchange rate for {currency} at or before {as_of}")]
    MissingRate {
        currency: Currency,
        as_of: DateTime<Utc>,
    },

    #[error("pivot currency {pivot} has no usable rate")]
    PivotUnavailable { pivot: Currency },

    #[error("converting {amount} from {from} to {to} overflows")]
    Overflow {
        amount: i64,
        from: Currency,
        to: Currency,
    },
}

impl ConversionError {
    /// True when nothing at all can be priced and the batch must stop.
    #[must_use]
    pub const fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::PivotUnavailable { .. })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("fetch from {market} failed: {reason}")]
    Fetch {
        market: MarketSource,
        reason: String,
    },

    #[error("graph fetch for {key} failed: {reason}")]
    Graph { key: ItemKey, reason: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
