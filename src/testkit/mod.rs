//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for items, listings, currencies and timestamps.
//! - [`adapter`] - Scripted port implementations: `ScriptedSource`,
//!   `StaticRates`, `StaticGraphs`.

pub mod adapter;
pub mod domain;
