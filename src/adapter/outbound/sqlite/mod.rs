//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed [`QuoteStore`](crate::port::outbound::store::QuoteStore)
//! implementation using Diesel ORM.

pub mod database;
pub mod store;
