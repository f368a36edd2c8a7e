//! JSON-file backed adapters.
//!
//! Every adapter re-reads its file on each call, so an external process can
//! drop fresh payloads between batches without restarting anything.
//!
//! Layouts:
//! - listing feed: `{ "<app_id>": [RawListing, ...] }`
//! - graphs: `<dir>/<app_id>/orders.json` and `<dir>/<app_id>/sales.json`,
//!   each `{ "<item key>": graph }`
//! - rates: `{ "history": [ExchangeRate, ...], "live": { "EUR": "0.91" } }`
//! - item store: `[CanonicalItem, ...]`

mod feed;
mod graphs;
mod rates;
mod store;

pub use feed::JsonFeedSource;
pub use graphs::JsonGraphs;
pub use rates::JsonRates;
pub use store::JsonItemStore;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
