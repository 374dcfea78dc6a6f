//! Workflow run summary and reporting

use crate::domain::{FailureKind, TableId, TableRunState, TableRunStatus};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// Terminal per-table states of one workflow run
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    /// Identifier shared by every log line of the run
    pub run_id: Uuid,

    /// Destination the tables were exported to
    pub destination: String,

    /// Final state of every requested table
    pub tables: BTreeMap<TableId, TableRunState>,

    /// Wall-clock time of the run
    pub duration: Duration,

    /// Whether a shutdown signal arrived during the run
    pub interrupted: bool,
}

impl WorkflowSummary {
    /// Create an empty summary
    pub fn new(run_id: Uuid, destination: impl Into<String>) -> Self {
        Self {
            run_id,
            destination: destination.into(),
            tables: BTreeMap::new(),
            duration: Duration::from_secs(0),
            interrupted: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a table's terminal state
    pub fn insert(&mut self, state: TableRunState) {
        self.tables.insert(state.table_id.clone(), state);
    }

    /// Final state of one table
    pub fn get(&self, table_id: &str) -> Option<&TableRunState> {
        self.tables.iter().find(|(id, _)| id.as_str() == table_id).map(|(_, s)| s)
    }

    /// Number of tables that reached `Succeeded`
    pub fn succeeded(&self) -> usize {
        self.count(TableRunStatus::Succeeded)
    }

    /// Number of tables that reached `Failed`
    pub fn failed(&self) -> usize {
        self.count(TableRunStatus::Failed)
    }

    fn count(&self, status: TableRunStatus) -> usize {
        self.tables.values().filter(|s| s.status == status).count()
    }

    /// Tables that failed for the given reason
    pub fn failed_with(&self, kind: FailureKind) -> Vec<&TableId> {
        self.tables
            .values()
            .filter(|s| s.failure == Some(kind))
            .map(|s| &s.table_id)
            .collect()
    }

    /// Whether every table succeeded
    pub fn is_successful(&self) -> bool {
        self.failed() == 0 && !self.interrupted
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.tables.is_empty() {
            return 100.0;
        }
        (self.succeeded() as f64 / self.tables.len() as f64) * 100.0
    }

    /// Consume the summary, keeping only the per-table states
    pub fn into_tables(self) -> BTreeMap<TableId, TableRunState> {
        self.tables
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            destination = %self.destination,
            tables = self.tables.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Workflow completed"
        );

        for state in self.tables.values().filter(|s| s.status == TableRunStatus::Failed) {
            tracing::warn!(
                run_id = %self.run_id,
                table_id = %state.table_id,
                failure = ?state.failure,
                error = state.last_error.as_deref().unwrap_or(""),
                "Table failed"
            );
        }
    }
}
