//! Dashboard read model: latest quotes, summary metrics, CSV export.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::quote::Quote;
use crate::domain::summary::Summary;
use crate::error::Result;
use crate::port::outbound::store::QuoteStore;

/// Column headers shared by the HTML table and the CSV export.
pub const COLUMNS: [&str; 5] = ["Symbol", "Price", "ATR", "Exit Price", "Last Updated"];

/// Point-in-time view rendered by the dashboard.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Newest quote per symbol, newest first.
    pub quotes: Vec<Quote>,
    /// `None` when no quotes have been received yet.
    pub summary: Option<Summary>,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Read-side service used by the dashboard and the CLI.
pub struct DashboardService {
    store: Arc<dyn QuoteStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Load the latest quote per symbol and compute summary metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let quotes = self.store.latest_per_symbol().await?;
        let summary = Summary::from_quotes(&quotes);
        Ok(Snapshot {
            quotes,
            summary,
            generated_at: Utc::now(),
        })
    }

    /// All quotes newest first, optionally limited.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn history(&self, limit: Option<u32>) -> Result<Vec<Quote>> {
        self.store.history(limit).await
    }
}

/// Render quotes as CSV with raw numbers and `YYYY-MM-DD HH:MM:SS` timestamps.
#[must_use]
pub fn export_csv(quotes: &[Quote]) -> String {
    let mut csv = COLUMNS.join(",");
    csv.push('\n');
    for quote in quotes {
        // Writing to a String cannot fail.
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            csv_field(quote.symbol.as_str()),
            quote.price.normalize(),
            quote.atr.normalize(),
            quote.exit_price().normalize(),
            quote.display_timestamp()
        );
    }
    csv
}

/// Download name for an export generated at `now`.
#[must_use]
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("investment_data_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
