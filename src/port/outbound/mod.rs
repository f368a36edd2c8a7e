//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's external collaborators: marketplace
//! feeds, graph payloads, exchange rates and item persistence.

pub mod graph;
pub mod rates;
pub mod source;
pub mod store;
