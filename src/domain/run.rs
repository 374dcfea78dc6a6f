//! Per-table run state and the workflow request
//!
//! A [`TableRunState`] moves strictly forward through
//! `Pending -> LocatingBackup -> Exporting -> WaitingForCompletion` and ends in
//! exactly one of `Succeeded` or `Failed`. `Failed` can be entered from any
//! non-terminal state; `Succeeded` only from `WaitingForCompletion`.

use super::backup::BackupRef;
use super::errors::FerryError;
use super::export::{ExportHandle, ExportStatus};
use super::ids::TableId;
use super::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Position of a table in its workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableRunStatus {
    Pending,
    LocatingBackup,
    Exporting,
    WaitingForCompletion,
    Succeeded,
    Failed,
}

impl TableRunStatus {
    /// Whether no further transitions can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::LocatingBackup => 1,
            Self::Exporting => 2,
            Self::WaitingForCompletion => 3,
            Self::Succeeded | Self::Failed => 4,
        }
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(&self, next: TableRunStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Failed => true,
            Self::Succeeded => *self == Self::WaitingForCompletion,
            _ => next.rank() == self.rank() + 1,
        }
    }
}

impl fmt::Display for TableRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Why a table run ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The table has no backup
    NotFound,
    /// A remote call failed or timed out
    RemoteError,
    /// The exporter reported `FAILED`
    ExportFailed,
    /// The run was shut down before the table finished
    Cancelled,
    /// The status never became terminal within the configured poll budget
    PollLimitExceeded,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::RemoteError => "remote_error",
            Self::ExportFailed => "export_failed",
            Self::Cancelled => "cancelled",
            Self::PollLimitExceeded => "poll_limit_exceeded",
        };
        f.write_str(s)
    }
}

/// Record of one table's progress through the workflow
///
/// Owned exclusively by the task driving that table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRunState {
    pub table_id: TableId,

    /// Set once the backup locator succeeds
    pub backup_ref: Option<BackupRef>,

    /// Set once the exporter has been called
    pub export_handle: Option<ExportHandle>,

    pub status: TableRunStatus,

    /// Message of the error that failed the run
    pub last_error: Option<String>,

    /// Category of the failure, `None` unless `status` is `Failed`
    pub failure: Option<FailureKind>,

    /// Number of status checks performed
    pub poll_attempts: u32,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TableRunState {
    /// Create a pending run for a table
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            backup_ref: None,
            export_handle: None,
            status: TableRunStatus::Pending,
            last_error: None,
            failure: None,
            poll_attempts: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Whether the run has finished
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Advance to a non-failed status
    ///
    /// # Errors
    ///
    /// Returns [`FerryError::InvalidTransition`] for backward moves, skipped
    /// steps, or any move out of a terminal state.
    pub fn advance(&mut self, next: TableRunStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(FerryError::InvalidTransition {
                table_id: self.table_id.to_string(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Record the located backup
    pub fn record_backup(&mut self, backup_ref: BackupRef) {
        self.backup_ref = Some(backup_ref);
    }

    /// Record (or refresh) the export handle
    pub fn record_export(&mut self, handle: ExportHandle) {
        self.export_handle = Some(handle);
    }

    /// Record the status seen by a poll
    pub fn record_poll(&mut self, status: ExportStatus) {
        self.poll_attempts += 1;
        if let Some(handle) = self.export_handle.as_mut() {
            handle.status = status;
        }
    }

    /// Finish the run as failed
    pub fn fail(&mut self, kind: FailureKind, message: impl Into<String>) -> Result<()> {
        self.advance(TableRunStatus::Failed)?;
        self.failure = Some(kind);
        self.last_error = Some(message.into());
        Ok(())
    }

    /// Finish the run as succeeded
    pub fn succeed(&mut self) -> Result<()> {
        self.advance(TableRunStatus::Succeeded)
    }
}

/// Input to a workflow run
///
/// Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    table_ids: Vec<TableId>,
    destination: String,
}

impl WorkflowRequest {
    /// Build a request, collapsing duplicate table ids
    ///
    /// # Errors
    ///
    /// Returns a validation error if the destination is blank.
    pub fn new(table_ids: Vec<TableId>, destination: impl Into<String>) -> Result<Self> {
        let destination = destination.into();
        if destination.trim().is_empty() {
            return Err(FerryError::Validation(
                "Destination cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(table_ids.len());
        for table_id in table_ids {
            if seen.insert(table_id.clone()) {
                unique.push(table_id);
            } else {
                tracing::warn!(table_id = %table_id, "Duplicate table id in request, ignoring");
            }
        }

        Ok(Self {
            table_ids: unique,
            destination,
        })
    }

    /// Build a request from raw strings
    pub fn from_strings<I, S>(table_ids: I, destination: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = table_ids
            .into_iter()
            .map(|s| TableId::new(s).map_err(FerryError::Validation))
            .collect::<Result<Vec<_>>>()?;
        Self::new(ids, destination)
    }

    pub fn table_ids(&self) -> &[TableId] {
        &self.table_ids
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn state() -> TableRunState {
        TableRunState::new(TableId::new("Orders").unwrap())
    }

    #[test]
    fn test_new_state_is_pending() {
        let s = state();
        assert_eq!(s.status, TableRunStatus::Pending);
        assert!(s.backup_ref.is_none());
        assert!(s.export_handle.is_none());
        assert!(s.finished_at.is_none());
    }

    #[test]
    fn test_full_forward_path() {
        let mut s = state();
        s.advance(TableRunStatus::LocatingBackup).unwrap();
        s.advance(TableRunStatus::Exporting).unwrap();
        s.advance(TableRunStatus::WaitingForCompletion).unwrap();
        s.succeed().unwrap();
        assert_eq!(s.status, TableRunStatus::Succeeded);
        assert!(s.finished_at.is_some());
        assert!(s.failure.is_none());
    }

    #[test_case(TableRunStatus::Pending, TableRunStatus::Exporting ; "skip locate")]
    #[test_case(TableRunStatus::Exporting, TableRunStatus::LocatingBackup ; "backwards")]
    #[test_case(TableRunStatus::Exporting, TableRunStatus::Succeeded ; "succeed before waiting")]
    #[test_case(TableRunStatus::Succeeded, TableRunStatus::Failed ; "out of succeeded")]
    #[test_case(TableRunStatus::Failed, TableRunStatus::Pending ; "out of failed")]
    fn test_illegal_transitions(from: TableRunStatus, to: TableRunStatus) {
        assert!(!from.can_transition_to(to));
    }

    #[test]
    fn test_fail_from_locating_records_error() {
        let mut s = state();
        s.advance(TableRunStatus::LocatingBackup).unwrap();
        s.fail(FailureKind::NotFound, "no backup").unwrap();
        assert_eq!(s.status, TableRunStatus::Failed);
        assert_eq!(s.failure, Some(FailureKind::NotFound));
        assert_eq!(s.last_error.as_deref(), Some("no backup"));
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut s = state();
        s.fail(FailureKind::Cancelled, "shutdown").unwrap();
        let err = s.advance(TableRunStatus::LocatingBackup).unwrap_err();
        assert!(matches!(err, FerryError::InvalidTransition { .. }));
        assert!(s.fail(FailureKind::RemoteError, "again").is_err());
        assert_eq!(s.last_error.as_deref(), Some("shutdown"));
    }

    #[test]
    fn test_record_poll_updates_handle() {
        let mut s = state();
        s.record_export(ExportHandle {
            destination_key: "Orders-1".to_string(),
            destination_path: "bkt/Orders-1".to_string(),
            status: ExportStatus::InProgress,
        });
        s.record_poll(ExportStatus::Succeeded);
        assert_eq!(s.poll_attempts, 1);
        assert_eq!(
            s.export_handle.as_ref().map(|h| h.status),
            Some(ExportStatus::Succeeded)
        );
    }

    #[test]
    fn test_request_dedupes_preserving_order() {
        let request = WorkflowRequest::from_strings(["B", "A", "B"], "bkt").unwrap();
        let ids: Vec<&str> = request.table_ids().iter().map(|t| t.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(request.destination(), "bkt");
    }

    #[test]
    fn test_request_rejects_blank_destination() {
        assert!(WorkflowRequest::from_strings(["A"], " ").is_err());
    }

    #[test]
    fn test_request_rejects_blank_table() {
        assert!(WorkflowRequest::from_strings(["A", ""], "bkt").is_err());
    }
}
