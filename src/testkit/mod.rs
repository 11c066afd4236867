//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`]: In-memory and always-failing [`QuoteStore`](crate::port::outbound::store::QuoteStore)
//!   implementations.
//! - [`domain`]: Builders for quotes and timestamps.
//! - [`config`]: Canonical test configurations (supervisor, full config).

pub mod config;
pub mod domain;
pub mod store;
