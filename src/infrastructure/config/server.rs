//! Listener settings for the webhook and dashboard services.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Webhook receiver settings (default port 8000).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_webhook_port")]
    pub port: u16,
    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Shared secret alerts must echo in their `passphrase` field.
    ///
    /// Loaded from `RISKBOARD_WEBHOOK_PASSPHRASE`, never from the file.
    #[serde(skip)]
    pub passphrase: Option<String>,
}

/// Dashboard settings (default port 8501).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    /// Page heading and `<title>`.
    #[serde(default = "default_title")]
    pub title: String,
    /// Browser auto-refresh interval; 0 disables it.
    #[serde(default)]
    pub refresh_secs: u32,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

const fn default_webhook_port() -> u16 {
    8000
}

const fn default_dashboard_port() -> u16 {
    8501
}

const fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_title() -> String {
    "Investment Dashboard".into()
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_webhook_port(),
            max_body_bytes: default_max_body_bytes(),
            passphrase: None,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_dashboard_port(),
            title: default_title(),
            refresh_secs: 0,
        }
    }
}

impl WebhookConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns an error if `host:port` is not a valid socket address.
    pub fn addr(&self) -> Result<SocketAddr> {
        parse_addr("webhook.host", &self.host, self.port)
    }
}

impl DashboardConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns an error if `host:port` is not a valid socket address.
    pub fn addr(&self) -> Result<SocketAddr> {
        parse_addr("dashboard.host", &self.host, self.port)
    }
}

fn parse_addr(field: &'static str, host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host.parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("'{host}' is not an IP address"),
    })?;
    Ok(SocketAddr::new(ip, port))
}
