//! Currency conversion through a pivot currency.

mod converter;
mod rates;

pub use converter::CurrencyConverter;
pub use rates::RateBook;
