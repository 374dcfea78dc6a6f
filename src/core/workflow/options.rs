//! Orchestrator tuning knobs

use crate::config::WorkflowConfig;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Default wait between export status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default budget for a single remote call
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(900);

/// How the orchestrator paces and bounds each table's run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Wait before every status check
    pub poll_interval: Duration,

    /// Fail a table after this many non-terminal status checks; `None` polls forever
    pub max_poll_attempts: Option<u32>,

    /// Budget for each remote call; elapsing it fails the table
    pub step_timeout: Duration,

    /// Cap on tables in flight at once; `None` runs every table immediately
    pub max_concurrency: Option<usize>,
}

impl WorkflowOptions {
    /// Build options from the `[workflow]` configuration section
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            max_poll_attempts: config.max_poll_attempts,
            step_timeout: Duration::from_secs(config.step_timeout_seconds),
            max_concurrency: config.max_concurrency,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_poll_attempts(mut self, max_poll_attempts: Option<u32>) -> Self {
        self.max_poll_attempts = max_poll_attempts;
        self
    }

    pub fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Whether `attempts` non-terminal checks exhaust the poll budget
    pub(crate) fn poll_budget_exhausted(&self, attempts: u32) -> bool {
        self.max_poll_attempts
            .map(|max| attempts >= max)
            .unwrap_or(false)
    }

    /// Permits for the concurrency semaphore, if a cap applies
    ///
    /// A cap the semaphore cannot hold is no cap at all, and zero is raised
    /// to one so the run still makes progress.
    pub(crate) fn concurrency_permits(&self) -> Option<usize> {
        self.max_concurrency
            .filter(|&limit| limit <= Semaphore::MAX_PERMITS)
            .map(|limit| limit.max(1))
    }
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: None,
            step_timeout: DEFAULT_STEP_TIMEOUT,
            max_concurrency: None,
        }
    }
}
