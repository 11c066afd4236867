//! Riskboard - TradingView webhook receiver and exit-price dashboard.
//!
//! Alerts carrying a symbol, its price, and its Average True Range are
//! posted to the webhook service, validated, and stored in SQLite. The
//! dashboard service shows the latest quote per symbol together with its
//! exit price (`price - ATR`), summary metrics, and a CSV export.
//!
//! # Architecture
//!
//! - [`domain`] - Symbols, quotes, exit-price math, summaries
//! - [`port`] - The [`QuoteStore`](port::outbound::store::QuoteStore) trait
//! - [`application`] - Ingest and dashboard use cases
//! - [`adapter`] - axum routers, the CLI, and the Diesel SQLite store
//! - [`infrastructure`] - Configuration, wiring, and the service supervisor
//!
//! # Example
//!
//! ```no_run
//! use riskboard::infrastructure::bootstrap::{build_services, build_supervisor};
//! use riskboard::infrastructure::config::settings::Config;
//!
//! # async fn run() -> riskboard::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let services = build_services(&config)?;
//! let (_tx, shutdown) = tokio::sync::watch::channel(false);
//! build_supervisor(&config, &services).run(shutdown).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
