//! Webhook ingest service.
//!
//! Validates TradingView alerts, checks the optional shared passphrase,
//! and persists accepted quotes.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::quote::{NewQuote, Quote};
use crate::error::{Error, Result};
use crate::port::outbound::store::QuoteStore;

/// A raw alert as received from the webhook, before validation.
#[derive(Debug, Clone)]
pub struct Alert {
    pub symbol: String,
    pub price: Decimal,
    pub atr: Decimal,
    pub passphrase: Option<String>,
}

/// Store connectivity as reported by health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    /// The store answered; `symbols` is the number of symbols with data.
    Connected { symbols: usize },
    /// The store failed with the given message.
    Failed { error: String },
}

/// Turns alerts into stored quotes.
pub struct IngestService {
    store: Arc<dyn QuoteStore>,
    passphrase: Option<String>,
}

impl IngestService {
    /// Create an ingest service. When `passphrase` is set every alert must carry it.
    pub fn new(store: Arc<dyn QuoteStore>, passphrase: Option<String>) -> Self {
        Self { store, passphrase }
    }

    /// Validate and persist one alert.
    ///
    /// # Errors
    ///
    /// - [`Error::Unauthorized`] when the passphrase does not match
    /// - [`Error::Domain`] when the alert violates a quote invariant
    /// - [`Error::Database`] when the store fails
    pub async fn ingest(&self, alert: Alert) -> Result<Quote> {
        self.authorize(alert.passphrase.as_deref())?;

        let quote = NewQuote::new(&alert.symbol, alert.price, alert.atr).inspect_err(|e| {
            warn!(symbol = %alert.symbol, reason = %e, "Rejected alert");
        })?;

        let stored = self
            .store
            .insert(quote, Utc::now())
            .await
            .map_err(|e| Error::Database(format!("failed to store data: {e}")))?;

        info!(
            symbol = %stored.symbol,
            price = %stored.price,
            atr = %stored.atr,
            exit_price = %stored.exit_price(),
            "Quote stored"
        );
        Ok(stored)
    }

    /// Probe the store and count symbols with data.
    pub async fn health(&self) -> StoreHealth {
        match self.store.latest_per_symbol().await {
            Ok(latest) => StoreHealth::Connected {
                symbols: latest.len(),
            },
            Err(e) => {
                warn!(error = %e, "Health check failed");
                StoreHealth::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn authorize(&self, provided: Option<&str>) -> Result<()> {
        match &self.passphrase {
            None => Ok(()),
            Some(expected) if provided.is_some_and(|p| constant_time_eq(p, expected)) => Ok(()),
            Some(_) => {
                warn!("Rejected alert with missing or wrong passphrase");
                Err(Error::Unauthorized)
            }
        }
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
