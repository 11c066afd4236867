//! Persistence port for quotes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::quote::{NewQuote, Quote};
use crate::error::Result;

/// Storage operations for received quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Persist a validated quote stamped with `recorded_at`.
    async fn insert(&self, quote: NewQuote, recorded_at: DateTime<Utc>) -> Result<Quote>;

    /// The newest quote of every symbol, newest first.
    async fn latest_per_symbol(&self) -> Result<Vec<Quote>>;

    /// All quotes newest first. `None` or `Some(0)` returns everything.
    async fn history(&self, limit: Option<u32>) -> Result<Vec<Quote>>;

    /// Total number of stored quotes.
    async fn count(&self) -> Result<u64>;

    /// Verify the backing store answers queries.
    async fn ping(&self) -> Result<()>;
}
