//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and per-connection
//! pragma configuration for SQLite databases.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const MAX_POOL_SIZE: u32 = 5;

/// Applies pragmas to every connection the pool opens.
///
/// Both services write and read concurrently, so writers wait on locks
/// instead of failing and readers do not block the writer.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn shared_memory_url() -> String {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("file:connection_test_db_{id}?mode=memory&cache=shared")
    }

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    #[derive(diesel::QueryableByName)]
    struct TableCount {
        #[diesel(sql_type = diesel::sql_types::BigInt)]
        count: i64,
    }

    #[test]
    fn create_pool_can_get_connection() {
        let pool = create_pool(&shared_memory_url()).unwrap();
        assert!(pool.get().is_ok());
    }

    #[test]
    fn run_migrations_creates_quote_table() {
        let pool = create_pool(&shared_memory_url()).unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let tables: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

        assert_eq!(tables, vec!["investment_data".to_string()]);
    }

    #[test]
    fn run_migrations_creates_symbol_index() {
        let pool = create_pool(&shared_memory_url()).unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let indexes: Vec<TableName> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='index' AND name='idx_symbol_timestamp'",
        )
        .load(&mut conn)
        .unwrap();
        assert_eq!(indexes.len(), 1);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = create_pool(&shared_memory_url()).unwrap();

        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = pool.get().unwrap();
        let result: i64 = diesel::sql_query(
            "SELECT COUNT(*) as count FROM sqlite_master WHERE type='table' AND name='investment_data'",
        )
        .load::<TableCount>(&mut conn)
        .unwrap()
        .first()
        .unwrap()
        .count;

        assert_eq!(result, 1);
    }

    #[test]
    fn file_backed_pool_uses_wal() {
        #[derive(diesel::QueryableByName)]
        struct JournalMode {
            #[diesel(sql_type = diesel::sql_types::Text)]
            journal_mode: String,
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.db");
        let pool = create_pool(&path.to_string_lossy()).unwrap();
        let mut conn = pool.get().unwrap();
        let mode: Vec<JournalMode> = diesel::sql_query("PRAGMA journal_mode")
            .load(&mut conn)
            .unwrap();
        assert_eq!(mode[0].journal_mode.to_lowercase(), "wal");
    }
}
