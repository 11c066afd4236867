//! Infrastructure bootstrap helpers for runtime wiring.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::adapter::inbound::http::{self, dashboard, webhook};
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::store::SqliteQuoteStore;
use crate::application::dashboard::DashboardService;
use crate::application::ingest::IngestService;
use crate::error::Result;
use crate::infrastructure::config::server::{DashboardConfig, WebhookConfig};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::supervisor::Supervisor;
use crate::port::outbound::store::QuoteStore;

/// Application services sharing one store.
#[derive(Clone)]
pub struct Services {
    pub ingest: Arc<IngestService>,
    pub dashboard: Arc<DashboardService>,
}

/// Open the SQLite database at `database`, creating its parent directory
/// and applying pending migrations.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the pool cannot be
/// built, or a migration fails.
pub fn open_store(database: &str) -> Result<SqliteQuoteStore> {
    if !database.starts_with("file:") && database != ":memory:" {
        if let Some(parent) = Path::new(database).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let pool = create_pool(database)?;
    run_migrations(&pool)?;
    info!(database, "Database ready");
    Ok(SqliteQuoteStore::new(pool))
}

/// Build the services over an already opened store.
pub fn services_with_store(config: &Config, store: Arc<dyn QuoteStore>) -> Services {
    Services {
        ingest: Arc::new(IngestService::new(
            Arc::clone(&store),
            config.webhook.passphrase.clone(),
        )),
        dashboard: Arc::new(DashboardService::new(store)),
    }
}

/// Open the configured database and build the services.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn build_services(config: &Config) -> Result<Services> {
    let store: Arc<dyn QuoteStore> = Arc::new(open_store(&config.database)?);
    Ok(services_with_store(config, store))
}

/// Run the webhook receiver until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_webhook(
    config: &WebhookConfig,
    ingest: Arc<IngestService>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let router = webhook::router(ingest, config.max_body_bytes);
    http::serve("webhook", config.addr()?, router, shutdown).await
}

/// Run the dashboard until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_dashboard(
    config: &DashboardConfig,
    service: Arc<DashboardService>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let router = dashboard::router(service, config.clone());
    http::serve("dashboard", config.addr()?, router, shutdown).await
}

/// Supervisor running both HTTP services over `services`.
#[must_use]
pub fn build_supervisor(config: &Config, services: &Services) -> Supervisor {
    let mut supervisor = Supervisor::new(config.supervisor.clone());

    let webhook_config = config.webhook.clone();
    let ingest = Arc::clone(&services.ingest);
    supervisor.add("webhook", move |shutdown| {
        let config = webhook_config.clone();
        let ingest = Arc::clone(&ingest);
        async move { run_webhook(&config, ingest, shutdown).await }
    });

    let dashboard_config = config.dashboard.clone();
    let dashboard = Arc::clone(&services.dashboard);
    supervisor.add("dashboard", move |shutdown| {
        let config = dashboard_config.clone();
        let dashboard = Arc::clone(&dashboard);
        async move { run_dashboard(&config, dashboard, shutdown).await }
    });

    supervisor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("quotes.db");

        open_store(&path.to_string_lossy()).unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn build_services_shares_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.db");
        let config = crate::testkit::config::config(path.to_string_lossy());

        let services = build_services(&config).unwrap();
        services
            .ingest
            .ingest(crate::application::ingest::Alert {
                symbol: "AAPL".into(),
                price: rust_decimal_macros::dec!(10),
                atr: rust_decimal_macros::dec!(1),
                passphrase: None,
            })
            .await
            .unwrap();

        let snapshot = services.dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.quotes.len(), 1);
    }

    #[test]
    fn supervisor_registers_both_services() {
        let config = crate::testkit::config::config("unused.db");
        let store: Arc<dyn QuoteStore> = Arc::new(crate::testkit::store::MemoryQuoteStore::new());
        let services = services_with_store(&config, store);

        let supervisor = build_supervisor(&config, &services);

        assert_eq!(supervisor.service_names(), vec!["webhook", "dashboard"]);
    }
}
