//! Test doubles for the quote store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::quote::{NewQuote, Quote};
use crate::error::{Error, Result};
use crate::port::outbound::store::QuoteStore;

/// Vec-backed store with the same ordering rules as the SQLite adapter.
#[derive(Default)]
pub struct MemoryQuoteStore {
    rows: Mutex<Vec<Quote>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored quote in insertion order.
    pub fn rows(&self) -> Vec<Quote> {
        self.rows.lock().clone()
    }

    fn newest_first(&self) -> Vec<Quote> {
        let mut rows = self.rows();
        rows.sort_by(|a, b| (b.recorded_at, b.id).cmp(&(a.recorded_at, a.id)));
        rows
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn insert(&self, quote: NewQuote, recorded_at: DateTime<Utc>) -> Result<Quote> {
        let mut rows = self.rows.lock();
        let id = rows.len() as i64 + 1;
        let stored = quote.into_quote(id, recorded_at);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn latest_per_symbol(&self) -> Result<Vec<Quote>> {
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|q| seen.insert(q.symbol.clone()))
            .collect())
    }

    async fn history(&self, limit: Option<u32>) -> Result<Vec<Quote>> {
        let rows = self.newest_first();
        Ok(match limit.filter(|l| *l > 0) {
            Some(limit) => rows.into_iter().take(limit as usize).collect(),
            None => rows,
        })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.rows.lock().len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Store whose every operation fails with a database error.
#[derive(Debug, Clone)]
pub struct FailingQuoteStore {
    message: String,
}

impl FailingQuoteStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn error(&self) -> Error {
        Error::Database(self.message.clone())
    }
}

#[async_trait]
impl QuoteStore for FailingQuoteStore {
    async fn insert(&self, _quote: NewQuote, _recorded_at: DateTime<Utc>) -> Result<Quote> {
        Err(self.error())
    }

    async fn latest_per_symbol(&self) -> Result<Vec<Quote>> {
        Err(self.error())
    }

    async fn history(&self, _limit: Option<u32>) -> Result<Vec<Quote>> {
        Err(self.error())
    }

    async fn count(&self) -> Result<u64> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<()> {
        Err(self.error())
    }
}
