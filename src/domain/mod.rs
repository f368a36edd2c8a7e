//! Source-agnostic domain types.

pub mod book;
pub mod currency;
pub mod error;
pub mod graph;
pub mod id;
pub mod item;
pub mod listing;
pub mod money;
pub mod sale;

pub use book::{BookSide, OrderLevel};
pub use currency::{Currency, ExchangeRate};
pub use error::DomainError;
pub use graph::{GraphRow, OrderGraph, SaleGraphPoint, SalesGraph};
pub use id::{AppId, ItemKey, MarketSource};
pub use item::{CanonicalItem, PriceWithSupply, SnapshotHistory};
pub use listing::RawListing;
pub use money::{MinorUnits, Quantity};
pub use sale::{SaleRecord, SalesAggregates, WindowStats};
