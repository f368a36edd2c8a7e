//! Application services (use cases).
//!
//! The engine components work on in-memory canonical items; the `sync`
//! services wire them to the outbound ports for one batch at a time.

pub mod currency;
pub mod orderbook;
pub mod reconcile;
pub mod sales;
pub mod snapshot;
pub mod summary;
pub mod sync;
