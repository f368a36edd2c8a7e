//! Normalized listings handed over by source adapters.

use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::error::DomainError;
use super::id::ItemKey;
use super::money::{MinorUnits, Quantity};

/// One discrete lot offered by a marketplace.
///
/// A marketplace may return several lots under the same key; the reconciler
/// folds them together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub key: ItemKey,
    /// Price in minor units of `currency`.
    pub price: MinorUnits,
    pub currency: Currency,
    /// Lot size, `None` when the source does not publish supply.
    #[serde(default)]
    pub quantity: Option<Quantity>,
}

impl RawListing {
    #[must_use]
    pub fn new(key: ItemKey, price: MinorUnits, currency: Currency, quantity: Option<Quantity>) -> Self {
        Self {
            key,
            price,
            currency,
            quantity,
        }
    }

    /// Check the listing is usable for a source quoting in `source_currency`.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`DomainError`].
    pub fn validate(&self, source_currency: &Currency) -> Result<(), DomainError> {
        if self.key.is_blank() {
            return Err(DomainError::EmptyKey);
        }
        if self.price < 0 {
            return Err(DomainError::NegativePrice { price: self.price });
        }
        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(DomainError::NegativeQuantity { quantity });
            }
        }
        if &self.currency != source_currency {
            return Err(DomainError::CurrencyMismatch {
                expected: source_currency.to_string(),
                found: self.currency.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    #[test]
    fn valid_listing_passes() {
        let listing = RawListing::new(ItemKey::new("Case Key"), 250, usd(), Some(3));
        assert_eq!(listing.validate(&usd()), Ok(()));
    }

    #[test]
    fn negative_values_are_rejected() {
        let listing = RawListing::new(ItemKey::new("Case Key"), -1, usd(), None);
        assert_eq!(
            listing.validate(&usd()),
            Err(DomainError::NegativePrice { price: -1 })
        );

        let listing = RawListing::new(ItemKey::new("Case Key"), 10, usd(), Some(-4));
        assert_eq!(
            listing.validate(&usd()),
            Err(DomainError::NegativeQuantity { quantity: -4 })
        );
    }

    #[test]
    fn foreign_currency_is_rejected() {
        let listing = RawListing::new(
            ItemKey::new("Case Key"),
            10,
            Currency::new("EUR").unwrap(),
            None,
        );
        assert!(matches!(
            listing.validate(&usd()),
            Err(DomainError::CurrencyMismatch { .. })
        ));
    }
}
