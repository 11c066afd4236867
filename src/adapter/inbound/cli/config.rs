//! Handler for the `config` command group.

use std::path::Path;

use crate::adapter::inbound::cli::{load_config, load_existing, output};
use crate::error::Result;
use crate::infrastructure::config::settings::PASSPHRASE_ENV;

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = load_config(path)?;

    if output::is_json() {
        output::record("config", serde_json::to_value(&config)?);
        return Ok(());
    }

    output::section("Effective Configuration");
    if !path.exists() {
        output::note(&format!("{} not found; showing defaults", path.display()));
    }
    for line in config.to_toml()?.lines() {
        println!("  {line}");
    }

    output::section("Secrets");
    if config.webhook.passphrase.is_some() {
        output::success(&format!("Webhook passphrase loaded from {PASSPHRASE_ENV}"));
    } else {
        output::warning(&format!("{PASSPHRASE_ENV} not set; webhook is unauthenticated"));
    }
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = load_existing(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::field("Webhook", config.webhook.addr()?);
    output::field("Dashboard", config.dashboard.addr()?);
    output::field("Database", &config.database);
    output::success("Configuration file is valid");
    Ok(())
}
