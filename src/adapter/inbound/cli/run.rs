//! Handlers for the long-running commands: `serve`, `webhook`, `dashboard`.

use std::path::Path;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_services, build_supervisor, run_dashboard, run_webhook};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::supervisor::ServiceState;

fn start(config_path: &Path) -> Result<Config> {
    let config = load_config(config_path)?;
    config.init_logging();

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", config_path.display());
    output::field("Database", &config.database);
    if config.webhook.passphrase.is_none() {
        output::warning("No webhook passphrase set; any client can post alerts");
    }
    Ok(config)
}

/// Execute `serve`: both services under the supervisor.
pub async fn execute_serve(config_path: &Path, shutdown: watch::Receiver<bool>) -> Result<()> {
    let config = start(config_path)?;
    output::field("Webhook", output::highlight(config.webhook.addr()?));
    output::field("Dashboard", output::highlight(config.dashboard.addr()?));
    if output::verbosity() > 0 {
        let supervisor = &config.supervisor;
        output::field(
            "Restarts",
            format!(
                "{}ms..{}ms x{}, fatal after {} failures",
                supervisor.initial_delay_ms,
                supervisor.max_delay_ms,
                supervisor.backoff_multiplier,
                supervisor.max_consecutive_failures
            ),
        );
    }

    let services = build_services(&config)?;
    let reports = build_supervisor(&config, &services).run(shutdown).await?;

    for report in &reports {
        if report.state == ServiceState::Fatal {
            warn!(service = %report.name, starts = report.starts, "Service ended fatal");
        }
    }
    info!("riskboard stopped");
    Ok(())
}

/// Execute `webhook`: the receiver alone, without restarts.
pub async fn execute_webhook(config_path: &Path, shutdown: watch::Receiver<bool>) -> Result<()> {
    let config = start(config_path)?;
    output::field("Webhook", output::highlight(config.webhook.addr()?));

    let services = build_services(&config)?;
    run_webhook(&config.webhook, services.ingest, shutdown).await
}

/// Execute `dashboard`: the dashboard alone, without restarts.
pub async fn execute_dashboard(
    config_path: &Path,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let config = start(config_path)?;
    output::field("Dashboard", output::highlight(config.dashboard.addr()?));

    let services = build_services(&config)?;
    run_dashboard(&config.dashboard, services.dashboard, shutdown).await
}
