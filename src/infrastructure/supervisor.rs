//! In-process service supervisor.
//!
//! Runs named long-lived services side by side and restarts any that exit
//! while the process is not shutting down. Restarts follow exponential
//! backoff with jitter. A service that fails `max_consecutive_failures`
//! times in a row is marked [`ServiceState::Fatal`] and left stopped while
//! the remaining services keep running.
//!
//! ```text
//!  Starting ──▶ Running ──exit──▶ Backoff ──delay──▶ Starting
//!                  │                  │
//!               shutdown          too many failures
//!                  ▼                  ▼
//!               Stopped             Fatal
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures_util::future::{join_all, BoxFuture};
use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::infrastructure::config::supervisor::SupervisorConfig;

/// Lifecycle state of a supervised service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Starting,
    Running,
    Backoff,
    Fatal,
    Stopped,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Backoff => "BACKOFF",
            Self::Fatal => "FATAL",
            Self::Stopped => "STOPPED",
        };
        f.write_str(label)
    }
}

type ServiceFactory = Arc<dyn Fn(watch::Receiver<bool>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

struct ServiceSpec {
    name: String,
    factory: ServiceFactory,
}

/// Shared view of every service's current state.
#[derive(Clone, Default)]
pub struct StateTable {
    inner: Arc<Mutex<BTreeMap<String, ServiceState>>>,
}

impl StateTable {
    /// Current state of `name`, if it is registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ServiceState> {
        self.inner.lock().get(name).copied()
    }

    /// Copy of all states keyed by service name.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, ServiceState> {
        self.inner.lock().clone()
    }

    fn set(&self, name: &str, state: ServiceState) {
        let previous = self.inner.lock().insert(name.to_string(), state);
        if previous != Some(state) {
            info!(service = name, state = %state, "Service state changed");
        }
    }
}

/// Final outcome of one supervised service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub name: String,
    pub state: ServiceState,
    /// Number of times the service was started, including the first.
    pub starts: u32,
}

/// Exponential backoff between restarts.
#[derive(Debug, Clone)]
struct Backoff {
    initial_delay_ms: u64,
    max_delay_ms: u64,
    multiplier: f64,
    current_delay_ms: u64,
    consecutive_failures: u32,
}

impl Backoff {
    fn new(config: &SupervisorConfig) -> Self {
        Self {
            initial_delay_ms: config.initial_delay_ms,
            max_delay_ms: config.max_delay_ms,
            multiplier: config.backoff_multiplier,
            current_delay_ms: config.initial_delay_ms,
            consecutive_failures: 0,
        }
    }

    fn reset(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay_ms = self.initial_delay_ms;
    }

    fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    /// Current delay plus up to 20% jitter; advances the delay for the next call.
    fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let delay = base_delay + Duration::from_millis(jitter_ms(base_delay));

        let next_delay = (self.current_delay_ms as f64 * self.multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.max_delay_ms);

        delay
    }
}

fn jitter_ms(base_delay: Duration) -> u64 {
    let jitter_range_ms = (base_delay.as_millis() as u64) / 5;
    if jitter_range_ms == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (jitter_range_ms + 1)
}

fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Resolves once shutdown is signalled. Never resolves if the sender is gone.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Starts, monitors, and restarts a set of named services.
pub struct Supervisor {
    config: SupervisorConfig,
    services: Vec<ServiceSpec>,
    states: StateTable,
}

impl Supervisor {
    #[must_use]
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            config,
            services: Vec::new(),
            states: StateTable::default(),
        }
    }

    /// Register a service. `factory` is called for every (re)start and receives
    /// the shutdown signal the run must honour.
    pub fn add<F, Fut>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(watch::Receiver<bool>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.services.push(ServiceSpec {
            name: name.into(),
            factory: Arc::new(move |shutdown| factory(shutdown).boxed()),
        });
    }

    /// Registered service names in registration order.
    #[must_use]
    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    /// Handle for observing service states while [`run`](Self::run) is active.
    #[must_use]
    pub fn states(&self) -> StateTable {
        self.states.clone()
    }

    /// Run every service until shutdown is signalled or all of them are fatal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Supervisor`] when no services are registered, or when
    /// every service ended fatal without a shutdown request.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<Vec<ServiceReport>> {
        if self.services.is_empty() {
            return Err(Error::Supervisor("no services registered".into()));
        }

        let names: Vec<String> = self.services.iter().map(|s| s.name.clone()).collect();
        info!(services = ?names, "Supervisor starting");

        let tasks: Vec<JoinHandle<ServiceReport>> = self
            .services
            .into_iter()
            .map(|service| {
                tokio::spawn(supervise(
                    service,
                    self.config.clone(),
                    shutdown.clone(),
                    self.states.clone(),
                ))
            })
            .collect();

        let mut reports = Vec::with_capacity(tasks.len());
        for (name, joined) in names.into_iter().zip(join_all(tasks).await) {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(service = %name, error = %e, "Supervision task failed");
                    reports.push(ServiceReport {
                        name,
                        state: ServiceState::Fatal,
                        starts: 0,
                    });
                }
            }
        }

        if !is_shutdown(&shutdown) && reports.iter().all(|r| r.state == ServiceState::Fatal) {
            return Err(Error::Supervisor("all services failed".into()));
        }

        info!("Supervisor stopped");
        Ok(reports)
    }
}

async fn supervise(
    service: ServiceSpec,
    config: SupervisorConfig,
    mut shutdown: watch::Receiver<bool>,
    states: StateTable,
) -> ServiceReport {
    let name = service.name;
    let stable_after = Duration::from_millis(config.stable_after_ms);
    let stop_wait = Duration::from_millis(config.stop_wait_ms);
    let mut backoff = Backoff::new(&config);
    let mut starts = 0u32;

    let finish = |state: ServiceState, starts: u32| {
        states.set(&name, state);
        ServiceReport {
            name: name.clone(),
            state,
            starts,
        }
    };

    loop {
        if is_shutdown(&shutdown) {
            return finish(ServiceState::Stopped, starts);
        }

        states.set(&name, ServiceState::Starting);
        starts += 1;
        let started = Instant::now();
        let mut run = tokio::spawn((service.factory)(shutdown.clone()));
        states.set(&name, ServiceState::Running);

        let exited = tokio::select! {
            joined = &mut run => Some(joined),
            () = shutdown_requested(&mut shutdown) => None,
        };

        let Some(outcome) = exited else {
            if tokio::time::timeout(stop_wait, &mut run).await.is_err() {
                warn!(service = %name, "Service did not stop in time; aborting");
                run.abort();
            }
            return finish(ServiceState::Stopped, starts);
        };

        if is_shutdown(&shutdown) {
            return finish(ServiceState::Stopped, starts);
        }

        match outcome {
            Ok(Ok(())) => warn!(service = %name, "Service exited unexpectedly"),
            Ok(Err(e)) => error!(service = %name, error = %e, "Service failed"),
            Err(e) => error!(service = %name, error = %e, "Service task panicked"),
        }

        if started.elapsed() >= stable_after {
            backoff.reset();
        }
        let failures = backoff.record_failure();
        if failures >= config.max_consecutive_failures {
            error!(service = %name, failures, "Giving up on service");
            return finish(ServiceState::Fatal, starts);
        }

        let delay = backoff.next_delay();
        states.set(&name, ServiceState::Backoff);
        info!(
            service = %name,
            failures,
            delay_ms = delay.as_millis() as u64,
            "Restarting service after backoff"
        );

        tokio::select! {
            () = sleep(delay) => {}
            () = shutdown_requested(&mut shutdown) => {
                return finish(ServiceState::Stopped, starts);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(max_failures: u32) -> SupervisorConfig {
        SupervisorConfig {
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
            max_consecutive_failures: max_failures,
            stable_after_ms: 60_000,
            stop_wait_ms: 1_000,
        }
    }

    #[test]
    fn backoff_grows_and_caps() {
        let mut backoff = Backoff::new(&SupervisorConfig {
            initial_delay_ms: 100,
            max_delay_ms: 300,
            backoff_multiplier: 2.0,
            ..SupervisorConfig::default()
        });

        let first = backoff.next_delay();
        let second = backoff.next_delay();
        let third = backoff.next_delay();
        let fourth = backoff.next_delay();

        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(120));
        assert!(second >= Duration::from_millis(200) && second <= Duration::from_millis(240));
        assert!(third >= Duration::from_millis(300) && third <= Duration::from_millis(360));
        assert!(fourth >= Duration::from_millis(300) && fourth <= Duration::from_millis(360));
    }

    #[test]
    fn backoff_reset_restores_initial_delay() {
        let mut backoff = Backoff::new(&SupervisorConfig {
            initial_delay_ms: 10,
            max_delay_ms: 1000,
            backoff_multiplier: 3.0,
            ..SupervisorConfig::default()
        });
        backoff.record_failure();
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();

        assert_eq!(backoff.consecutive_failures, 0);
        assert_eq!(backoff.current_delay_ms, 10);
    }

    #[test]
    fn jitter_is_zero_for_tiny_delays() {
        assert_eq!(jitter_ms(Duration::from_millis(4)), 0);
    }

    #[tokio::test]
    async fn failing_service_becomes_fatal_after_limit() {
        let starts = Arc::new(AtomicU32::new(0));
        let counter = starts.clone();

        let mut supervisor = Supervisor::new(config(3));
        supervisor.add("broken", move |_shutdown| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), Error>(Error::Server("bind failed".into()))
            }
        });

        let (_tx, rx) = watch::channel(false);
        let result = supervisor.run(rx).await;

        assert!(matches!(result, Err(Error::Supervisor(_))));
        assert_eq!(starts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn shutdown_stops_running_service() {
        let mut supervisor = Supervisor::new(config(3));
        supervisor.add("steady", |mut shutdown| async move {
            shutdown_requested(&mut shutdown).await;
            Ok::<(), Error>(())
        });
        let states = supervisor.states();

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(supervisor.run(rx));

        for _ in 0..100 {
            if states.get("steady") == Some(ServiceState::Running) {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(states.get("steady"), Some(ServiceState::Running));

        tx.send(true).unwrap();
        let reports = handle.await.unwrap().unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].state, ServiceState::Stopped);
        assert_eq!(reports[0].starts, 1);
    }

    #[tokio::test]
    async fn run_without_services_is_an_error() {
        let (_tx, rx) = watch::channel(false);
        let result = Supervisor::new(config(1)).run(rx).await;
        assert!(matches!(result, Err(Error::Supervisor(_))));
    }

    #[test]
    fn state_labels_are_uppercase() {
        assert_eq!(ServiceState::Backoff.to_string(), "BACKOFF");
        assert_eq!(ServiceState::Fatal.to_string(), "FATAL");
    }
}
