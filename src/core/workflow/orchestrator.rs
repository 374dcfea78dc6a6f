//! Workflow orchestrator - fans a request out into independent table runs
//!
//! Each table runs in its own tokio task, so one table's failure, timeout or
//! panic never touches another's state. `run` returns once every table is
//! terminal.

use super::options::WorkflowOptions;
use super::summary::WorkflowSummary;
use super::table_run::{run_table, TableRunContext};
use crate::adapters::backup::BackupLocator;
use crate::adapters::export::Exporter;
use crate::domain::{FailureKind, TableId, TableRunState, WorkflowRequest};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinError;
use tracing::Instrument;
use uuid::Uuid;

/// Runs backup exports for a batch of tables
pub struct WorkflowOrchestrator {
    locator: Arc<dyn BackupLocator>,
    exporter: Arc<dyn Exporter>,
    options: WorkflowOptions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl WorkflowOrchestrator {
    /// Create an orchestrator over the given locator and exporter
    pub fn new(
        locator: Arc<dyn BackupLocator>,
        exporter: Arc<dyn Exporter>,
        options: WorkflowOptions,
    ) -> Self {
        Self {
            locator,
            exporter,
            options,
            shutdown: None,
        }
    }

    /// Stop tables at their next safe point once `shutdown` turns true
    ///
    /// Tables that have not started finish as cancelled without any remote
    /// call. Tables waiting between status checks finish as cancelled and keep
    /// their export handle. A remote call already in flight completes first.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn options(&self) -> &WorkflowOptions {
        &self.options
    }

    /// Run every table of `request` to a terminal state
    pub async fn run(&self, request: &WorkflowRequest) -> WorkflowSummary {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4();
        let mut summary = WorkflowSummary::new(run_id, request.destination());

        // Without a caller-provided signal the sender is dropped at once,
        // which table runs treat as "never cancelled".
        let shutdown = self
            .shutdown
            .clone()
            .unwrap_or_else(|| watch::channel(false).1);

        tracing::info!(
            run_id = %run_id,
            destination = %request.destination(),
            table_count = request.table_ids().len(),
            max_concurrency = ?self.options.max_concurrency,
            "Starting workflow"
        );

        let ctx = TableRunContext {
            locator: Arc::clone(&self.locator),
            exporter: Arc::clone(&self.exporter),
            options: self.options.clone(),
            destination: Arc::from(request.destination()),
        };
        let semaphore = self
            .options
            .concurrency_permits()
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let mut table_ids = Vec::with_capacity(request.table_ids().len());
        let mut tasks = Vec::with_capacity(request.table_ids().len());
        for table_id in request.table_ids() {
            let ctx = ctx.clone();
            let shutdown = shutdown.clone();
            let semaphore = semaphore.clone();
            let task_table_id = table_id.clone();
            let span = tracing::info_span!("table_run", run_id = %run_id, table_id = %table_id);

            tasks.push(tokio::spawn(
                async move {
                    let _permit = match semaphore {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    run_table(ctx, task_table_id, shutdown).await
                }
                .instrument(span),
            ));
            table_ids.push(table_id.clone());
        }

        for (table_id, joined) in table_ids.into_iter().zip(join_all(tasks).await) {
            let state = match joined {
                Ok(state) => state,
                Err(e) => aborted(table_id, &e),
            };
            summary.insert(state);
        }

        summary.interrupted = *shutdown.borrow();
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }
}

/// Terminal state for a table whose task panicked or was aborted
fn aborted(table_id: TableId, error: &JoinError) -> TableRunState {
    tracing::error!(table_id = %table_id, error = %error, "Table run aborted");
    let mut state = TableRunState::new(table_id);
    if let Err(e) = state.fail(FailureKind::RemoteError, "table run aborted") {
        tracing::error!(error = %e, "Could not record aborted table run");
    }
    state
}
