//! SQLite quote store implementation.
//!
//! Provides persistent storage for webhook quotes using SQLite and Diesel ORM.
//! Diesel is synchronous, so every call runs on the blocking thread pool.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{NewQuoteRow, QuoteRow};
use crate::adapter::outbound::sqlite::database::schema::investment_data;
use crate::domain::id::Symbol;
use crate::domain::quote::{storage_timestamp, NewQuote, Quote};
use crate::error::{Error, Result};
use crate::port::outbound::store::QuoteStore;

const LATEST_PER_SYMBOL_SQL: &str = "\
    SELECT id, symbol, price, atr, timestamp FROM (\
        SELECT id, symbol, price, atr, timestamp, \
               ROW_NUMBER() OVER (PARTITION BY symbol ORDER BY timestamp DESC, id DESC) AS rn \
        FROM investment_data\
    ) WHERE rn = 1 \
    ORDER BY timestamp DESC, id DESC";

#[derive(diesel::QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    #[diesel(column_name = "id")]
    id: i64,
}

/// SQLite-backed quote store.
///
/// Implements the [`QuoteStore`] trait. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct SqliteQuoteStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteQuoteStore {
    /// Create a new SQLite quote store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(quote: &NewQuote, recorded_at: DateTime<Utc>) -> NewQuoteRow {
        NewQuoteRow {
            symbol: quote.symbol().to_string(),
            price: quote.price().to_string(),
            atr: quote.atr().to_string(),
            timestamp: storage_timestamp(recorded_at),
        }
    }

    fn from_row(row: QuoteRow) -> Result<Quote> {
        let symbol = Symbol::parse(&row.symbol).map_err(|e| Error::Parse(e.to_string()))?;
        let price = Decimal::from_str(&row.price).map_err(|e| Error::Parse(e.to_string()))?;
        let atr = Decimal::from_str(&row.atr).map_err(|e| Error::Parse(e.to_string()))?;
        let recorded_at = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(Quote {
            id: row.id,
            symbol,
            price,
            atr,
            recorded_at,
        })
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
            f(&mut *conn)
        })
        .await?
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    async fn insert(&self, quote: NewQuote, recorded_at: DateTime<Utc>) -> Result<Quote> {
        // Stored timestamps carry microseconds; match them in the returned quote.
        let recorded_at = recorded_at.trunc_subsecs(6);
        let row = Self::to_row(&quote, recorded_at);
        let id = self
            .with_conn(move |conn| {
                conn.transaction(|conn| {
                    diesel::insert_into(investment_data::table)
                        .values(&row)
                        .execute(conn)?;

                    diesel::sql_query("SELECT last_insert_rowid() AS id")
                        .get_result::<LastInsertRowId>(conn)
                        .map(|row| row.id)
                })
                .map_err(Error::from)
            })
            .await?;

        debug!(id, symbol = %quote.symbol(), "Stored quote");
        Ok(quote.into_quote(id, recorded_at))
    }

    async fn latest_per_symbol(&self) -> Result<Vec<Quote>> {
        let rows: Vec<QuoteRow> = self
            .with_conn(|conn| {
                diesel::sql_query(LATEST_PER_SYMBOL_SQL)
                    .load(conn)
                    .map_err(Error::from)
            })
            .await?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn history(&self, limit: Option<u32>) -> Result<Vec<Quote>> {
        let rows: Vec<QuoteRow> = self
            .with_conn(move |conn| {
                let mut query = investment_data::table
                    .select(QuoteRow::as_select())
                    .order((investment_data::timestamp.desc(), investment_data::id.desc()))
                    .into_boxed();
                if let Some(limit) = limit.filter(|l| *l > 0) {
                    query = query.limit(i64::from(limit));
                }
                query.load(conn).map_err(Error::from)
            })
            .await?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = self
            .with_conn(|conn| {
                investment_data::table
                    .count()
                    .get_result(conn)
                    .map_err(Error::from)
            })
            .await?;

        u64::try_from(count).map_err(|e| Error::Parse(e.to_string()))
    }

    async fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1")
                .execute(conn)
                .map(|_| ())
                .map_err(Error::from)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn setup_store() -> SqliteQuoteStore {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_url = format!("file:store_test_db_{id}?mode=memory&cache=shared");
        let pool = create_pool(&db_url).unwrap();
        run_migrations(&pool).unwrap();
        SqliteQuoteStore::new(pool)
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 15, minute, 0).unwrap()
    }

    fn quote(symbol: &str, price: Decimal, atr: Decimal) -> NewQuote {
        NewQuote::new(symbol, price, atr).unwrap()
    }

    #[tokio::test]
    async fn inserted_quote_equals_row_read_back() {
        let store = setup_store();
        let recorded_at = at(0) + chrono::Duration::nanoseconds(123_456_789);

        let inserted = store
            .insert(quote("AAPL", dec!(150.25), dec!(2.35)), recorded_at)
            .await
            .unwrap();
        let stored = store.history(None).await.unwrap();

        assert_eq!(inserted.recorded_at, at(0) + chrono::Duration::microseconds(123_456));
        assert_eq!(stored, vec![inserted]);
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = setup_store();
        let first = store
            .insert(quote("AAPL", dec!(150.25), dec!(2.35)), at(0))
            .await
            .unwrap();
        let second = store
            .insert(quote("AAPL", dec!(151), dec!(2.4)), at(1))
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.price, dec!(150.25));
        assert_eq!(first.recorded_at, at(0));
    }

    #[tokio::test]
    async fn decimals_survive_storage_exactly() {
        let store = setup_store();
        store
            .insert(quote("BTCUSD", dec!(64123.123456789), dec!(0.000001)), at(0))
            .await
            .unwrap();

        let rows = store.history(None).await.unwrap();
        assert_eq!(rows[0].price, dec!(64123.123456789));
        assert_eq!(rows[0].atr, dec!(0.000001));
    }

    #[tokio::test]
    async fn latest_per_symbol_keeps_newest_row_per_symbol() {
        let store = setup_store();
        store.insert(quote("AAPL", dec!(150), dec!(2)), at(0)).await.unwrap();
        store.insert(quote("MSFT", dec!(410), dec!(5)), at(1)).await.unwrap();
        store.insert(quote("AAPL", dec!(152), dec!(2.5)), at(2)).await.unwrap();

        let latest = store.latest_per_symbol().await.unwrap();

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].symbol.as_str(), "AAPL");
        assert_eq!(latest[0].price, dec!(152));
        assert_eq!(latest[1].symbol.as_str(), "MSFT");
    }

    #[tokio::test]
    async fn latest_per_symbol_breaks_timestamp_ties_by_id() {
        let store = setup_store();
        store.insert(quote("ETH", dec!(3000), dec!(50)), at(5)).await.unwrap();
        store.insert(quote("ETH", dec!(3010), dec!(51)), at(5)).await.unwrap();

        let latest = store.latest_per_symbol().await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].price, dec!(3010));
    }

    #[tokio::test]
    async fn latest_per_symbol_is_empty_without_data() {
        let store = setup_store();
        assert!(store.latest_per_symbol().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_is_newest_first_and_respects_limit() {
        let store = setup_store();
        for minute in 0..5 {
            store
                .insert(quote("SPY", Decimal::from(500 + minute), dec!(4)), at(minute))
                .await
                .unwrap();
        }

        let all = store.history(None).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].price, dec!(504));

        let limited = store.history(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].price, dec!(503));

        let zero = store.history(Some(0)).await.unwrap();
        assert_eq!(zero.len(), 5);
    }

    #[tokio::test]
    async fn count_and_ping() {
        let store = setup_store();
        store.ping().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        store.insert(quote("QQQ", dec!(430), dec!(3)), at(0)).await.unwrap();
        store.insert(quote("QQQ", dec!(431), dec!(3)), at(1)).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
