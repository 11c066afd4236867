//! Restart policy for supervised services.

use serde::{Deserialize, Serialize};

/// Backoff and give-up settings applied to every supervised service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupervisorConfig {
    /// Delay before the first restart (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between restarts (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to the delay after each failed run.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Consecutive failures after which a service is marked fatal.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
    /// A run lasting at least this long resets the failure count (milliseconds).
    #[serde(default = "default_stable_after_ms")]
    pub stable_after_ms: u64,
    /// Grace period for a service to stop after shutdown before it is aborted (milliseconds).
    #[serde(default = "default_stop_wait_ms")]
    pub stop_wait_ms: u64,
}

fn default_initial_delay_ms() -> u64 {
    1000 // 1 second
}

fn default_max_delay_ms() -> u64 {
    30000 // 30 seconds
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_consecutive_failures() -> u32 {
    5
}

fn default_stable_after_ms() -> u64 {
    10000 // 10 seconds
}

fn default_stop_wait_ms() -> u64 {
    10000 // 10 seconds
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_consecutive_failures: default_max_consecutive_failures(),
            stable_after_ms: default_stable_after_ms(),
            stop_wait_ms: default_stop_wait_ms(),
        }
    }
}
