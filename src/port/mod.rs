//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (marketplaces, rate feeds, databases).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Source  │            │   Store     │              │   Rates   │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`SourceAdapter`], [`SourceRegistry`] - Marketplace listing feeds
//! - [`GraphAdapter`] - Order-depth histograms and sales graphs
//! - [`ExchangeRateProvider`] - Pivot-relative exchange rates
//! - [`ItemStore`] - Persistence for canonical items

pub mod outbound;

pub use outbound::graph::GraphAdapter;
pub use outbound::rates::ExchangeRateProvider;
pub use outbound::source::{RegisteredSource, SourceAdapter, SourceRegistry};
pub use outbound::store::ItemStore;
