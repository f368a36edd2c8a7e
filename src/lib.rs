//! Pricesync - multi-source price reconciliation and history reconstruction
//! for tradable virtual items.
//!
//! The engine keeps one canonical record per `(app, item)` and, on each
//! scheduled batch, folds fresh marketplace data into it:
//!
//! - buy prices from every registered listing source, grouped per item and
//!   converted into the item's currency
//! - per-level order books rebuilt from cumulative depth histograms
//! - deduplicated sales history with windowed and all-time aggregates
//! - rolling, newest-first snapshot buffers
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Value types with no I/O: items, listings, currencies, books
//! - [`application`] - The engine components and the batch services driving them
//! - [`port`] - Traits for marketplaces, graphs, rates and persistence
//! - [`adapter`] - JSON-file and in-memory port implementations, the CLI
//! - [`infrastructure`] - Configuration, logging and service wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use pricesync::application::currency::{CurrencyConverter, RateBook};
//! use pricesync::domain::Currency;
//! use rust_decimal_macros::dec;
//!
//! let usd = Currency::usd();
//! let eur = Currency::new("EUR").unwrap();
//!
//! let mut rates = RateBook::new();
//! rates.set_live(usd.clone(), dec!(1));
//! rates.set_live(eur.clone(), dec!(0.9137));
//!
//! let now = chrono::Utc::now();
//! let converter = CurrencyConverter::new(usd.clone(), rates, now).unwrap();
//! assert_eq!(converter.convert(1000, &usd, &eur, now).unwrap(), 914);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
