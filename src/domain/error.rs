//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! Most of them describe a malformed listing: the offending record is skipped
//! and reported, the rest of the source's feed is still reconciled.
//!
//! # Examples
//!
//! ```
//! use pricesync::domain::error::DomainError;
//! use pricesync::domain::{Currency, ItemKey, RawListing};
//!
//! let listing = RawListing::new(ItemKey::new(""), 500, Currency::new("USD").unwrap(), Some(1));
//! assert!(matches!(listing.validate(&Currency::new("USD").unwrap()), Err(DomainError::EmptyKey)));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Listings must name the item they price.
    #[error("listing has an empty item key")]
    EmptyKey,

    /// Prices are minor units and can never be negative.
    #[error("price must not be negative, got {price}")]
    NegativePrice {
        /// The invalid price that was provided.
        price: i64,
    },

    /// Quantities are discrete counts and can never be negative.
    #[error("quantity must not be negative, got {quantity}")]
    NegativeQuantity {
        /// The invalid quantity that was provided.
        quantity: i64,
    },

    /// A listing was priced in a currency other than its source's.
    #[error("listing currency {found} does not match source currency {expected}")]
    CurrencyMismatch {
        /// The currency the source declares.
        expected: String,
        /// The currency found on the listing.
        found: String,
    },

    /// Currency codes are three ASCII letters.
    #[error("invalid currency code '{code}'")]
    InvalidCurrency {
        /// The rejected code.
        code: String,
    },
}
