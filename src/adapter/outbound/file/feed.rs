//! Listing feed read from a JSON file.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::read_json;
use crate::domain::{AppId, Currency, MarketSource, RawListing};
use crate::error::{Error, Result};
use crate::port::SourceAdapter;

/// A marketplace whose snapshot is a JSON file of listings per app.
#[derive(Debug, Clone)]
pub struct JsonFeedSource {
    source: MarketSource,
    currency: Currency,
    path: PathBuf,
}

impl JsonFeedSource {
    #[must_use]
    pub fn new(source: MarketSource, currency: Currency, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            currency,
            path: path.into(),
        }
    }
}

#[async_trait]
impl SourceAdapter for JsonFeedSource {
    fn source(&self) -> &MarketSource {
        &self.source
    }

    fn currency(&self) -> &Currency {
        &self.currency
    }

    async fn fetch_listings(&self, app_id: AppId) -> Result<Vec<RawListing>> {
        let mut feed: HashMap<String, Vec<RawListing>> =
            read_json(&self.path).await.map_err(|e| Error::Fetch {
                market: self.source.clone(),
                reason: e.to_string(),
            })?;

        // An app missing from the feed has no listings on this source.
        let listings = feed.remove(&app_id.to_string()).unwrap_or_default();
        debug!(source = %self.source, %app_id, listings = listings.len(), "Read listing feed");
        Ok(listings)
    }
}
