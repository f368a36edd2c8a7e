//! Multi-source price reconciliation.
//!
//! Folds one source's normalized listings into the canonical items' buy
//! price maps. The reconciler is source-agnostic and pure: no I/O happens
//! here, so it can safely run under the item-set lock.
//!
//! Rules, per item:
//! - lots sharing a key collapse to the minimum price and summed supply
//! - a key present in the feed sets the source's entry (converted into the
//!   item's currency)
//! - a key absent from a successful feed removes the source's entry
//! - a group with zero supply counts as absent
//! - the item is only marked dirty when its map actually changed

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::currency::CurrencyConverter;
use super::summary::{ItemFailure, RejectedListing, SourceReport};
use crate::domain::money::{scale, MinorUnits, Quantity};
use crate::domain::{CanonicalItem, Currency, ItemKey, MarketSource, PriceWithSupply, RawListing};
use crate::error::ConversionError;

/// Per-source pricing constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePricing {
    pub source: MarketSource,
    /// Currency the source quotes its listings in.
    pub currency: Currency,
    /// Store discount or normalisation factor applied to the best price.
    pub price_multiplier: Decimal,
}

impl SourcePricing {
    #[must_use]
    pub fn new(source: MarketSource, currency: Currency) -> Self {
        Self {
            source,
            currency,
            price_multiplier: Decimal::ONE,
        }
    }

    #[must_use]
    pub fn with_multiplier(mut self, multiplier: Decimal) -> Self {
        self.price_multiplier = multiplier;
        self
    }
}

/// All lots for one key, folded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingGroup {
    /// Best (lowest) listed price, in the source currency.
    pub price: MinorUnits,
    /// Sum of known lot sizes; `None` when no lot published one.
    pub supply: Option<Quantity>,
    pub lots: usize,
}

impl ListingGroup {
    fn from_listing(listing: &RawListing) -> Self {
        Self {
            price: listing.price,
            supply: listing.quantity,
            lots: 1,
        }
    }

    fn absorb(&mut self, listing: &RawListing) {
        self.price = self.price.min(listing.price);
        self.supply = match (self.supply, listing.quantity) {
            (Some(total), Some(q)) => Some(total.saturating_add(q)),
            (total, q) => total.or(q),
        };
        self.lots += 1;
    }

    /// True when the source reported the key but nothing can be bought.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self.supply, Some(supply) if supply <= 0)
    }
}

/// A source feed grouped by item key.
#[derive(Debug, Clone, Default)]
pub struct GroupedListings {
    groups: HashMap<ItemKey, ListingGroup>,
    rejected: Vec<RejectedListing>,
}

impl GroupedListings {
    /// Validate and group listings quoted in `currency`.
    ///
    /// Malformed listings are set aside individually; they never invalidate
    /// the rest of the feed.
    #[must_use]
    pub fn build(listings: &[RawListing], currency: &Currency) -> Self {
        let mut grouped = Self::default();
        for listing in listings {
            if let Err(err) = listing.validate(currency) {
                debug!(key = %listing.key, error = %err, "Skipping malformed listing");
                grouped.rejected.push(RejectedListing {
                    key: listing.key.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
            grouped
                .groups
                .entry(listing.key.clone())
                .and_modify(|group| group.absorb(listing))
                .or_insert_with(|| ListingGroup::from_listing(listing));
        }
        grouped
    }

    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&ListingGroup> {
        self.groups.get(key)
    }

    #[must_use]
    pub fn rejected(&self) -> &[RejectedListing] {
        &self.rejected
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// How one item's entry for a source changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemChange {
    Unchanged,
    Added,
    Updated,
    Removed,
}

impl ItemChange {
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Reconciles source feeds against canonical items with a fixed rate snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PriceReconciler<'a> {
    converter: &'a CurrencyConverter,
    as_of: DateTime<Utc>,
}

impl<'a> PriceReconciler<'a> {
    #[must_use]
    pub const fn new(converter: &'a CurrencyConverter, as_of: DateTime<Utc>) -> Self {
        Self { converter, as_of }
    }

    /// Reconcile one item against a complete, successfully fetched feed.
    ///
    /// Returns whether the item's entry for the source changed.
    ///
    /// # Errors
    ///
    /// A conversion failure abandons this item's update for the source and
    /// leaves its existing entry in place.
    pub fn reconcile(
        &self,
        item: &mut CanonicalItem,
        pricing: &SourcePricing,
        listings: &[RawListing],
    ) -> Result<bool, ConversionError> {
        let grouped = GroupedListings::build(listings, &pricing.currency);
        self.reconcile_group(item, pricing, grouped.get(&item.key))
            .map(ItemChange::is_change)
    }

    /// Reconcile one item given its (possibly absent) listing group.
    ///
    /// # Errors
    ///
    /// See [`PriceReconciler::reconcile`].
    pub fn reconcile_group(
        &self,
        item: &mut CanonicalItem,
        pricing: &SourcePricing,
        group: Option<&ListingGroup>,
    ) -> Result<ItemChange, ConversionError> {
        let desired = match group {
            Some(group) if !group.is_unavailable() => Some(self.price_entry(item, pricing, group)?),
            _ => None,
        };

        let current = item.buy_prices.get(&pricing.source).copied();
        let change = match (current, desired) {
            (Some(current), Some(next)) if current == next => ItemChange::Unchanged,
            (None, None) => ItemChange::Unchanged,
            (Some(_), Some(next)) => {
                item.buy_prices.insert(pricing.source.clone(), next);
                ItemChange::Updated
            }
            (None, Some(next)) => {
                item.buy_prices.insert(pricing.source.clone(), next);
                ItemChange::Added
            }
            (Some(_), None) => {
                item.buy_prices.remove(&pricing.source);
                ItemChange::Removed
            }
        };

        if change.is_change() {
            item.mark_dirty();
        }
        Ok(change)
    }

    /// Reconcile a whole item set against one source's feed.
    pub fn reconcile_all(
        &self,
        items: &mut [CanonicalItem],
        pricing: &SourcePricing,
        listings: &[RawListing],
    ) -> SourceReport {
        let grouped = GroupedListings::build(listings, &pricing.currency);
        let mut report = SourceReport {
            rejected: grouped.rejected().to_vec(),
            ..SourceReport::default()
        };
        let mut matched = 0;

        for item in items.iter_mut() {
            let group = grouped.get(&item.key);
            if group.is_some() {
                matched += 1;
            }
            match self.reconcile_group(item, pricing, group) {
                Ok(ItemChange::Unchanged) => report.unchanged += 1,
                Ok(ItemChange::Added) => report.added += 1,
                Ok(ItemChange::Updated) => report.updated += 1,
                Ok(ItemChange::Removed) => report.removed += 1,
                Err(err) => {
                    warn!(
                        source = %pricing.source,
                        item = %item.key,
                        error = %err,
                        "Abandoning item update"
                    );
                    report.failures.push(ItemFailure::new(item.key.clone(), err));
                }
            }
        }

        report.unmatched = grouped.len().saturating_sub(matched);
        report
    }

    fn price_entry(
        &self,
        item: &CanonicalItem,
        pricing: &SourcePricing,
        group: &ListingGroup,
    ) -> Result<PriceWithSupply, ConversionError> {
        let discounted =
            scale(group.price, pricing.price_multiplier).ok_or_else(|| ConversionError::Overflow {
                amount: group.price,
                from: pricing.currency.clone(),
                to: pricing.currency.clone(),
            })?;
        let price = self
            .converter
            .convert(discounted, &pricing.currency, &item.currency, self.as_of)?;
        Ok(PriceWithSupply::new(price, group.supply))
    }
}
