//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - Tables not yet started are cancelled without remote calls
//! - Tables waiting on an export stop at the next wait and keep their handle
//! - The run still returns only terminal states and reports the interruption

use async_trait::async_trait;
use chrono::Utc;
use ferry::adapters::backup::BackupLocator;
use ferry::adapters::export::Exporter;
use ferry::core::workflow::{WorkflowOptions, WorkflowOrchestrator};
use ferry::domain::{
    BackupRef, ExportHandle, ExportOutcome, ExportStatus, FailureKind, LocateError,
    RemoteCallError, StatusCheck, TableId, TableRunStatus, WorkflowRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Default)]
struct CountingLocator {
    calls: AtomicUsize,
}

#[async_trait]
impl BackupLocator for CountingLocator {
    async fn locate(&self, table_id: &TableId) -> Result<BackupRef, LocateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BackupRef::new(format!("arn:{table_id}"), Utc::now()))
    }
}

/// Exports that never finish
struct StuckExporter;

#[async_trait]
impl Exporter for StuckExporter {
    async fn start_export(
        &self,
        table_id: &TableId,
        destination: &str,
    ) -> Result<ExportOutcome, RemoteCallError> {
        Ok(ExportOutcome {
            destination_key: format!("{table_id}-1"),
            destination_path: format!("{destination}/{table_id}-1"),
            status: ExportStatus::InProgress,
            message: None,
        })
    }

    async fn export_status(&self, _handle: &ExportHandle) -> Result<StatusCheck, RemoteCallError> {
        Ok(ExportStatus::InProgress.into())
    }
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_shutdown_before_run_cancels_everything() {
    let locator = Arc::new(CountingLocator::default());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    let orchestrator = WorkflowOrchestrator::new(
        locator.clone(),
        Arc::new(StuckExporter),
        WorkflowOptions::default(),
    )
    .with_shutdown(shutdown_rx);
    let request = WorkflowRequest::from_strings(["A", "B"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert!(summary.interrupted);
    assert_eq!(locator.calls.load(Ordering::SeqCst), 0);
    for state in summary.tables.values() {
        assert_eq!(state.status, TableRunStatus::Failed);
        assert_eq!(state.failure, Some(FailureKind::Cancelled));
        assert!(state.backup_ref.is_none());
    }
}

#[tokio::test]
async fn test_shutdown_while_waiting_keeps_handle() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(CountingLocator::default()),
        Arc::new(StuckExporter),
        WorkflowOptions::default().with_poll_interval(Duration::from_millis(20)),
    )
    .with_shutdown(shutdown_rx);
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let run = tokio::spawn(async move { orchestrator.run(&request).await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(true).unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run should stop after shutdown")
        .unwrap();

    assert!(summary.interrupted);
    assert!(!summary.is_successful());
    let orders = summary.get("Orders").unwrap();
    assert_eq!(orders.status, TableRunStatus::Failed);
    assert_eq!(orders.failure, Some(FailureKind::Cancelled));
    assert!(orders.poll_attempts >= 1);
    assert_eq!(
        orders.export_handle.as_ref().map(|h| h.destination_key.as_str()),
        Some("Orders-1")
    );
}

#[tokio::test]
async fn test_dropped_sender_never_cancels() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    drop(shutdown_tx);

    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(CountingLocator::default()),
        Arc::new(StuckExporter),
        WorkflowOptions::default()
            .with_poll_interval(Duration::from_millis(1))
            .with_max_poll_attempts(Some(3)),
    )
    .with_shutdown(shutdown_rx);
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert!(!summary.interrupted);
    assert_eq!(
        summary.get("Orders").unwrap().failure,
        Some(FailureKind::PollLimitExceeded)
    );
}
