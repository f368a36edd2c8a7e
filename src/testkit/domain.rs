//! Builders for domain primitives used across tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    AppId, CanonicalItem, Currency, ItemKey, MarketSource, MinorUnits, Quantity, RawListing,
};

/// App id most fixtures live under.
pub const APP: AppId = AppId::new(730);

/// Parse a currency code.
///
/// # Panics
///
/// On an invalid code.
pub fn currency(code: &str) -> Currency {
    Currency::new(code).expect("valid currency code")
}

pub fn source(name: &str) -> MarketSource {
    MarketSource::new(name)
}

/// A USD item under [`APP`].
pub fn item(key: &str) -> CanonicalItem {
    CanonicalItem::new(APP, ItemKey::new(key), Currency::usd())
}

/// An item under [`APP`] priced in `code`.
pub fn item_in(key: &str, code: &str) -> CanonicalItem {
    CanonicalItem::new(APP, ItemKey::new(key), currency(code))
}

/// A listing with known quantity.
pub fn listing(key: &str, price: MinorUnits, code: &str, quantity: Quantity) -> RawListing {
    RawListing::new(ItemKey::new(key), price, currency(code), Some(quantity))
}

/// A listing whose quantity the source does not publish.
pub fn listing_unknown_qty(key: &str, price: MinorUnits, code: &str) -> RawListing {
    RawListing::new(ItemKey::new(key), price, currency(code), None)
}

/// A UTC instant at the top of the given hour.
///
/// # Panics
///
/// On an impossible date.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}
