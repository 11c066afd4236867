//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for deployment-specific values like `RISKBOARD_DATABASE` and secrets like
//! `RISKBOARD_WEBHOOK_PASSPHRASE`.
//!
//! # Example
//!
//! ```no_run
//! use riskboard::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::{LoggingConfig, LOG_FORMATS};
use super::server::{DashboardConfig, WebhookConfig};
use super::supervisor::SupervisorConfig;
use crate::error::{ConfigError, Result};

/// Overrides the `database` key.
pub const DATABASE_ENV: &str = "RISKBOARD_DATABASE";

/// Supplies the webhook passphrase.
pub const PASSPHRASE_ENV: &str = "RISKBOARD_WEBHOOK_PASSPHRASE";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults. Load from a
/// TOML file using [`Config::load`] or parse directly with [`Config::parse_toml`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the SQLite database file.
    ///
    /// Defaults to "investment_data.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Webhook receiver listener and limits.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Dashboard listener and presentation.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Restart policy for `serve`.
    #[serde(default)]
    pub supervisor: SupervisorConfig,
}

fn default_database_path() -> String {
    "investment_data.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            webhook: WebhookConfig::default(),
            dashboard: DashboardConfig::default(),
            supervisor: SupervisorConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content, applying process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with(content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml_with<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.finish(env)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration from a TOML file, or use defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is unreadable or invalid, or if
    /// the environment overrides fail validation.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::default().finish(|key| std::env::var(key).ok())
        }
    }

    fn finish<F>(mut self, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = env(DATABASE_ENV).filter(|v| !v.trim().is_empty()) {
            self.database = database;
        }
        self.webhook.passphrase = env(PASSPHRASE_ENV).filter(|v| !v.is_empty());

        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }

        if self.webhook.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "webhook.port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.dashboard.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.port",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.webhook.port == self.dashboard.port {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.port",
                reason: "must differ from webhook.port".to_string(),
            }
            .into());
        }
        self.webhook.addr()?;
        self.dashboard.addr()?;
        if self.webhook.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_body_bytes",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let supervisor = &self.supervisor;
        if supervisor.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if supervisor.max_delay_ms < supervisor.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if !supervisor.backoff_multiplier.is_finite() || supervisor.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be a finite number >= 1.0".to_string(),
            }
            .into());
        }
        if supervisor.max_consecutive_failures == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_consecutive_failures",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Render the effective configuration as TOML. Secrets are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::error::Error::Parse(e.to_string()))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
