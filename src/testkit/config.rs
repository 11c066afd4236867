//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::supervisor::SupervisorConfig;

/// Supervisor config with millisecond backoff so restart tests finish quickly.
pub fn supervisor(max_consecutive_failures: u32) -> SupervisorConfig {
    SupervisorConfig {
        initial_delay_ms: 1,
        max_delay_ms: 4,
        backoff_multiplier: 2.0,
        max_consecutive_failures,
        stable_after_ms: 60_000,
        stop_wait_ms: 500,
    }
}

/// Full config pointing at `database`, bound to loopback, no passphrase.
pub fn config(database: impl Into<String>) -> Config {
    let mut config = Config {
        database: database.into(),
        supervisor: supervisor(3),
        ..Config::default()
    };
    config.webhook.host = "127.0.0.1".to_string();
    config.dashboard.host = "127.0.0.1".to_string();
    config
}
