//! Infrastructure: configuration, logging and service wiring.

pub mod bootstrap;
pub mod config;
