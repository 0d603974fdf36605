//! Scheduled Jobs
//!
//! Runs the periodic operations of every module declaring the periodic
//! capability on a fixed interval.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::Config;
use crate::modules::{Capability, Modules};

// =========================================================================
// Periodic Scheduler
// =========================================================================

/// Configuration for the periodic scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between runs (default: 1 minute)
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.periodic_interval(),
        }
    }
}

/// Periodic Scheduler - drives `Modules::run_periodic`
pub struct PeriodicScheduler {
    modules: Modules,
    config: SchedulerConfig,
}

impl PeriodicScheduler {
    pub fn new(modules: Modules) -> Self {
        Self {
            modules,
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(modules: Modules, config: SchedulerConfig) -> Self {
        Self { modules, config }
    }

    /// Start the scheduler in the background.
    /// Returns a handle that can be used to abort the scheduler.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        if self.modules.count(Capability::Periodic) == 0 {
            tracing::info!("No periodic modules registered, scheduler idle");
            return;
        }

        tracing::info!(interval_secs = self.config.interval.as_secs(), "Periodic scheduler started");

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.run_once().await;
            if !report.errors.is_empty() {
                tracing::warn!(failed = report.errors.len(), "Periodic run finished with errors");
            }
        }
    }

    /// Run every periodic operation once (for manual trigger or testing)
    pub async fn run_once(&self) -> PeriodicReport {
        let mut report = PeriodicReport {
            modules_run: self.modules.count(Capability::Periodic),
            ..PeriodicReport::default()
        };

        if let Err(e) = self.modules.run_periodic().await {
            report.errors = e
                .failures()
                .iter()
                .map(|(module, err)| format!("{}: {}", module, err))
                .collect();
        }

        report.completed_at = Utc::now();
        report
    }
}

/// Report from one periodic run
#[derive(Debug, Clone, Default)]
pub struct PeriodicReport {
    pub modules_run: usize,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{Capabilities, Module, ModuleError};
    use crate::store::StoreError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter {
        runs: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Module for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn capabilities(&self) -> Capabilities {
            Capability::Periodic.into()
        }

        async fn run_periodic(&self) -> Result<(), ModuleError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::internal("unavailable").into());
            }
            Ok(())
        }
    }

    fn scheduler(fail: bool) -> (PeriodicScheduler, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let module: Arc<dyn Module> = Arc::new(Counter {
            runs: runs.clone(),
            fail,
        });
        (PeriodicScheduler::new(Modules::new(vec![module])), runs)
    }

    #[test]
    fn test_scheduler_config_default() {
        let config = SchedulerConfig::default();
        assert_eq!(config.interval, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_run_once() {
        let (scheduler, runs) = scheduler(false);

        let report = scheduler.run_once().await;

        assert_eq!(report.modules_run, 1);
        assert!(report.errors.is_empty());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_once_reports_failures() {
        let (scheduler, _) = scheduler(true);

        let report = scheduler.run_once().await;

        assert_eq!(report.errors, vec!["counter: internal error: unavailable"]);
    }
}
