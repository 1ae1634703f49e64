//! Dependent service health gate
//!
//! Runs the readiness checks in order every [`CHECK_INTERVAL`] until a whole
//! cycle passes.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::checks::{ClusterCheck, EndpointCheck, ListenerCheck, ReadinessCheck};
use crate::config::ProbeConfig;
use crate::discovery::{EndpointDiscovery, XdsClient};
use crate::error::{Error, Result};

/// Delay between check cycles
pub const CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Blocks start-up until the dependent services have been discovered
pub struct DependServiceHealthController {
    checks: Vec<Box<dyn ReadinessCheck>>,
    max_attempts: Option<u32>,
}

impl DependServiceHealthController {
    /// Create a controller talking to the configured discovery service.
    ///
    /// Fails with [`Error::Connection`] if the discovery endpoint cannot be
    /// set up; no polling happens in that case.
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let discovery = XdsClient::connect_lazy(&config.xds)?;
        info!(
            xds = %discovery.target(),
            cluster_id = %config.cluster_id,
            depend_services = %config.depend_services,
            "Dependent service health controller created"
        );
        Ok(Self::with_discovery(config, discovery))
    }

    /// Create a controller using an existing discovery client
    pub fn with_discovery<D>(config: &ProbeConfig, discovery: D) -> Self
    where
        D: EndpointDiscovery + 'static,
    {
        let checks: Vec<Box<dyn ReadinessCheck>> = vec![
            Box::new(ListenerCheck),
            Box::new(ClusterCheck),
            Box::new(EndpointCheck::new(
                discovery,
                config.cluster_id.clone(),
                config.depend_services.clone(),
                config.satisfaction,
            )),
        ];

        Self::with_checks(checks).with_max_attempts(config.max_attempts)
    }

    /// Create a controller running `checks` in the given order
    #[must_use]
    pub fn with_checks(checks: Vec<Box<dyn ReadinessCheck>>) -> Self {
        Self {
            checks,
            max_attempts: None,
        }
    }

    /// Give up after `max_attempts` cycles instead of polling forever
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Run every check once, stopping at the first that fails
    pub async fn run_cycle(&self) -> bool {
        for check in &self.checks {
            if !check.check().await {
                debug!(check = check.name(), "Readiness check not passed");
                return false;
            }
        }
        true
    }

    /// Block until a full cycle of checks passes.
    ///
    /// The first cycle runs immediately, later ones on each tick of
    /// [`CHECK_INTERVAL`]. Without an attempt cap this only returns `Ok`.
    pub async fn check(&self) -> Result<()> {
        let mut ticker = interval(CHECK_INTERVAL);
        // An overdue tick fires at once, later ones stay on the 5 s grid
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately
        ticker.tick().await;

        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            if self.run_cycle().await {
                info!(attempts, "Depend services all check passed, will start service");
                return Ok(());
            }

            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    warn!(attempts, "Giving up waiting for dependent services");
                    return Err(Error::AttemptsExhausted(attempts));
                }
            }

            ticker.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records its name on every call and passes after `fail_times` calls
    struct RecordingCheck {
        name: &'static str,
        fail_times: usize,
        calls: AtomicUsize,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl RecordingCheck {
        fn boxed(
            name: &'static str,
            fail_times: usize,
            log: &Arc<Mutex<Vec<&'static str>>>,
        ) -> Box<dyn ReadinessCheck> {
            Box::new(Self {
                name,
                fail_times,
                calls: AtomicUsize::new(0),
                log: log.clone(),
            })
        }
    }

    #[async_trait]
    impl ReadinessCheck for RecordingCheck {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn check(&self) -> bool {
            self.log.lock().unwrap().push(self.name);
            self.calls.fetch_add(1, Ordering::SeqCst) >= self.fail_times
        }
    }

    #[tokio::test]
    async fn test_cycle_runs_checks_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let controller = DependServiceHealthController::with_checks(vec![
            RecordingCheck::boxed("listener", 0, &log),
            RecordingCheck::boxed("cluster", 0, &log),
            RecordingCheck::boxed("endpoint", 0, &log),
        ]);

        assert!(controller.run_cycle().await);
        assert_eq!(*log.lock().unwrap(), vec!["listener", "cluster", "endpoint"]);
    }

    #[tokio::test]
    async fn test_cycle_short_circuits_on_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let controller = DependServiceHealthController::with_checks(vec![
            RecordingCheck::boxed("listener", 0, &log),
            RecordingCheck::boxed("cluster", 1, &log),
            RecordingCheck::boxed("endpoint", 0, &log),
        ]);

        assert!(!controller.run_cycle().await);
        assert_eq!(*log.lock().unwrap(), vec!["listener", "cluster"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_retries_on_fixed_interval() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let controller = DependServiceHealthController::with_checks(vec![
            RecordingCheck::boxed("endpoint", 2, &log),
        ]);

        let start = tokio::time::Instant::now();
        controller.check().await.unwrap();

        assert_eq!(log.lock().unwrap().len(), 3);
        assert_eq!(start.elapsed(), CHECK_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_passes_immediately_without_waiting() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let controller =
            DependServiceHealthController::with_checks(vec![RecordingCheck::boxed("endpoint", 0, &log)]);

        let start = tokio::time::Instant::now();
        controller.check().await.unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_gives_up_after_max_attempts() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let controller = DependServiceHealthController::with_checks(vec![
            RecordingCheck::boxed("endpoint", usize::MAX, &log),
        ])
        .with_max_attempts(Some(3));

        let result = controller.check().await;

        assert!(matches!(result, Err(Error::AttemptsExhausted(3))));
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    /// Takes `delay` on its first call and fails it, then passes
    struct SlowFirstCheck {
        delay: Duration,
        calls: Arc<Mutex<Vec<tokio::time::Instant>>>,
    }

    #[async_trait]
    impl ReadinessCheck for SlowFirstCheck {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn check(&self) -> bool {
            let first = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(tokio::time::Instant::now());
                calls.len() == 1
            };
            if first {
                tokio::time::sleep(self.delay).await;
            }
            self.calls.lock().unwrap().len() >= 3
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cycle_retried_at_once_then_on_interval_grid() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let controller = DependServiceHealthController::with_checks(vec![Box::new(SlowFirstCheck {
            delay: Duration::from_secs(12),
            calls: calls.clone(),
        })]);

        let start = tokio::time::Instant::now();
        controller.check().await.unwrap();

        let offsets: Vec<Duration> = calls.lock().unwrap().iter().map(|t| *t - start).collect();
        assert_eq!(
            offsets,
            vec![Duration::ZERO, Duration::from_secs(12), Duration::from_secs(15)]
        );
    }
}
