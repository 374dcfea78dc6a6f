//! Integration tests for the workflow orchestrator
//!
//! These tests verify that:
//! - Each table reaches exactly one terminal state
//! - A failing table never affects its siblings
//! - Polling stops as soon as a terminal status is seen
//! - Unknown statuses keep a table polling unless a poll budget is set
//! - The concurrency cap is honoured

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ferry::adapters::backup::{BackupCatalog, BackupLocator, CatalogBackupLocator};
use ferry::adapters::export::{
    export_key, Exporter, FsObjectStore, ObjectStore, SnapshotExporter, TableSource,
};
use ferry::core::workflow::{WorkflowOptions, WorkflowOrchestrator};
use ferry::domain::{
    BackupRef, BackupSummary, ExportHandle, ExportOutcome, ExportStatus, FailureKind, FerryError,
    LocateError, RemoteCallError, StatusCheck, TableId, TableRunStatus, WorkflowRequest,
};
use regex::Regex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Locator with a fixed answer per table; unknown tables are not found
#[derive(Default)]
struct MapLocator {
    backups: HashMap<String, BackupRef>,
}

impl MapLocator {
    fn with(mut self, table: &str) -> Self {
        self.backups.insert(
            table.to_string(),
            BackupRef::new(
                format!("arn:aws:dynamodb:backup/{table}"),
                Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            ),
        );
        self
    }
}

#[async_trait]
impl BackupLocator for MapLocator {
    async fn locate(&self, table_id: &TableId) -> Result<BackupRef, LocateError> {
        self.backups
            .get(table_id.as_str())
            .cloned()
            .ok_or_else(|| LocateError::NotFound {
                table_id: table_id.to_string(),
            })
    }
}

/// Exporter that reports a scripted status on every check
struct RecordingExporter {
    initial: ExportStatus,
    check_status: Option<&'static str>,
    start_error: Option<RemoteCallError>,
    start_delay: Duration,
    started: Mutex<Vec<String>>,
    status_checks: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingExporter {
    fn new(initial: ExportStatus, check_status: Option<&'static str>) -> Self {
        Self {
            initial,
            check_status,
            start_error: None,
            start_delay: Duration::ZERO,
            started: Mutex::new(Vec::new()),
            status_checks: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn succeeding() -> Self {
        Self::new(ExportStatus::Succeeded, Some("SUCCEEDED"))
    }

    fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl Exporter for RecordingExporter {
    async fn start_export(
        &self,
        table_id: &TableId,
        destination: &str,
    ) -> Result<ExportOutcome, RemoteCallError> {
        self.started.lock().unwrap().push(table_id.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.start_delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(err) = &self.start_error {
            return Err(err.clone());
        }

        let key = export_key(table_id, Utc::now());
        Ok(ExportOutcome {
            destination_path: format!("{destination}/{key}"),
            destination_key: key,
            status: self.initial,
            message: None,
        })
    }

    async fn export_status(&self, _handle: &ExportHandle) -> Result<StatusCheck, RemoteCallError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        Ok(ExportStatus::from_wire(self.check_status).into())
    }
}

fn fast_options() -> WorkflowOptions {
    WorkflowOptions::default().with_poll_interval(Duration::from_millis(5))
}

fn orchestrator(
    locator: MapLocator,
    exporter: Arc<RecordingExporter>,
    options: WorkflowOptions,
) -> WorkflowOrchestrator {
    WorkflowOrchestrator::new(Arc::new(locator), exporter, options)
}

#[tokio::test]
async fn test_orders_end_to_end() {
    let exporter = Arc::new(RecordingExporter::succeeding());
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let orders = summary.get("Orders").unwrap();
    assert_eq!(orders.status, TableRunStatus::Succeeded);
    assert_eq!(
        orders.backup_ref.as_ref().map(|b| b.arn.as_str()),
        Some("arn:aws:dynamodb:backup/Orders")
    );

    let handle = orders.export_handle.as_ref().unwrap();
    let pattern = Regex::new(r"^Orders-\d{8}T\d{6}\.\d{3}Z$").unwrap();
    assert!(pattern.is_match(&handle.destination_key), "{}", handle.destination_key);
    assert_eq!(handle.status, ExportStatus::Succeeded);
    assert!(summary.is_successful());
}

#[tokio::test]
async fn test_failing_table_does_not_affect_sibling() {
    let exporter = Arc::new(RecordingExporter::succeeding());
    let orchestrator = orchestrator(MapLocator::default().with("B"), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["A", "B"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert_eq!(summary.tables.len(), 2);
    let a = summary.get("A").unwrap();
    assert_eq!(a.status, TableRunStatus::Failed);
    assert_eq!(a.failure, Some(FailureKind::NotFound));
    assert_eq!(
        summary.get("B").map(|s| s.status),
        Some(TableRunStatus::Succeeded)
    );
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);
}

#[tokio::test]
async fn test_not_found_never_calls_exporter() {
    let exporter = Arc::new(RecordingExporter::succeeding());
    let orchestrator = orchestrator(MapLocator::default(), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["Ghost"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let ghost = summary.get("Ghost").unwrap();
    assert_eq!(ghost.status, TableRunStatus::Failed);
    assert!(ghost.last_error.as_deref().unwrap().contains("Ghost"));
    assert!(ghost.export_handle.is_none());
    assert!(exporter.started().is_empty());
    assert_eq!(exporter.status_checks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_export_error_preserves_message() {
    let mut exporter = RecordingExporter::succeeding();
    exporter.start_error = Some(RemoteCallError::Transport("connection reset by peer".to_string()));
    let exporter = Arc::new(exporter);
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let orders = summary.get("Orders").unwrap();
    assert_eq!(orders.status, TableRunStatus::Failed);
    assert_eq!(orders.failure, Some(FailureKind::RemoteError));
    assert!(orders
        .last_error
        .as_deref()
        .unwrap()
        .contains("connection reset by peer"));
}

#[tokio::test]
async fn test_success_checks_status_exactly_once() {
    let exporter = Arc::new(RecordingExporter::succeeding());
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert_eq!(exporter.status_checks.load(Ordering::SeqCst), 1);
    assert_eq!(summary.get("Orders").unwrap().poll_attempts, 1);
}

#[tokio::test]
async fn test_unknown_status_keeps_polling_without_budget() {
    let exporter = Arc::new(RecordingExporter::new(ExportStatus::InProgress, Some("RUNNING")));
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let outcome = tokio::time::timeout(Duration::from_millis(200), orchestrator.run(&request)).await;

    assert!(outcome.is_err(), "run should still be polling");
    assert!(exporter.status_checks.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_missing_status_fails_after_poll_budget() {
    let exporter = Arc::new(RecordingExporter::new(ExportStatus::InProgress, None));
    let options = fast_options().with_max_poll_attempts(Some(4));
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter.clone(), options);
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let orders = summary.get("Orders").unwrap();
    assert_eq!(orders.status, TableRunStatus::Failed);
    assert_eq!(orders.failure, Some(FailureKind::PollLimitExceeded));
    assert_eq!(orders.poll_attempts, 4);
    assert_eq!(exporter.status_checks.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_step_timeout_fails_table() {
    let mut exporter = RecordingExporter::succeeding();
    exporter.start_delay = Duration::from_secs(5);
    let exporter = Arc::new(exporter);
    let options = fast_options().with_step_timeout(Duration::from_millis(20));
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter, options);
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let orders = summary.get("Orders").unwrap();
    assert_eq!(orders.status, TableRunStatus::Failed);
    assert_eq!(orders.failure, Some(FailureKind::RemoteError));
    assert!(orders.last_error.as_deref().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_concurrency_cap_is_honoured() {
    let tables = ["T1", "T2", "T3", "T4", "T5", "T6"];
    let locator = tables.iter().fold(MapLocator::default(), |l, t| l.with(t));
    let mut exporter = RecordingExporter::succeeding();
    exporter.start_delay = Duration::from_millis(30);
    let exporter = Arc::new(exporter);
    let options = fast_options().with_max_concurrency(Some(2));
    let orchestrator = orchestrator(locator, exporter.clone(), options);
    let request = WorkflowRequest::from_strings(tables, "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert_eq!(summary.succeeded(), tables.len());
    assert!(exporter.max_in_flight.load(Ordering::SeqCst) <= 2);
    assert_eq!(exporter.started().len(), tables.len());
}

#[tokio::test]
async fn test_uncapped_tables_run_concurrently() {
    let tables = ["T1", "T2", "T3", "T4"];
    let locator = tables.iter().fold(MapLocator::default(), |l, t| l.with(t));
    let mut exporter = RecordingExporter::succeeding();
    exporter.start_delay = Duration::from_millis(50);
    let exporter = Arc::new(exporter);
    let orchestrator = orchestrator(locator, exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(tables, "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert_eq!(summary.succeeded(), tables.len());
    assert!(exporter.max_in_flight.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_duplicate_tables_run_once() {
    let exporter = Arc::new(RecordingExporter::succeeding());
    let orchestrator = orchestrator(MapLocator::default().with("Orders"), exporter.clone(), fast_options());
    let request = WorkflowRequest::from_strings(["Orders", "Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    assert_eq!(summary.tables.len(), 1);
    assert_eq!(exporter.started(), vec!["Orders".to_string()]);
}

/// Catalog listing several backups per table
struct ListingCatalog;

#[async_trait]
impl BackupCatalog for ListingCatalog {
    async fn list_backups(&self, table_id: &TableId) -> Result<Vec<BackupSummary>, RemoteCallError> {
        if table_id.as_str() != "Orders" {
            return Ok(vec![]);
        }
        Ok(vec![
            BackupSummary::new("arn:old", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            BackupSummary::new("arn:newest", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            BackupSummary::new("arn:middle", Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
        ])
    }
}

/// Table source with fixed rows, failing for one table
struct FixtureSource;

#[async_trait]
impl TableSource for FixtureSource {
    async fn scan(&self, table_id: &TableId) -> ferry::domain::Result<Vec<serde_json::Value>> {
        match table_id.as_str() {
            "Orders" => Ok(vec![json!({"id": 1, "total": 9.5}), json!({"id": 2, "total": 3.0})]),
            other => Err(FerryError::Other(format!("scan of {other} denied"))),
        }
    }
}

#[tokio::test]
async fn test_snapshot_export_writes_object() {
    let dir = TempDir::new().unwrap();
    let store = FsObjectStore::new(dir.path());
    let exporter = SnapshotExporter::new(FixtureSource, store);
    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(CatalogBackupLocator::new(ListingCatalog)),
        Arc::new(exporter),
        fast_options(),
    );
    let request = WorkflowRequest::from_strings(["Orders"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let orders = summary.get("Orders").unwrap();
    assert_eq!(orders.status, TableRunStatus::Succeeded);
    assert_eq!(orders.backup_ref.as_ref().unwrap().arn, "arn:newest");

    let key = &orders.export_handle.as_ref().unwrap().destination_key;
    let written = std::fs::read_to_string(dir.path().join("bkt").join(key)).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_str(&written).unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_snapshot_read_failure_is_export_failed() {
    struct AlwaysFound;

    #[async_trait]
    impl BackupCatalog for AlwaysFound {
        async fn list_backups(&self, _table_id: &TableId) -> Result<Vec<BackupSummary>, RemoteCallError> {
            Ok(vec![BackupSummary::new("arn:1", Utc::now())])
        }
    }

    let dir = TempDir::new().unwrap();
    let exporter = SnapshotExporter::new(FixtureSource, FsObjectStore::new(dir.path()));
    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(CatalogBackupLocator::new(AlwaysFound)),
        Arc::new(exporter),
        fast_options(),
    );
    let request = WorkflowRequest::from_strings(["Invoices"], "bkt").unwrap();

    let summary = orchestrator.run(&request).await;

    let invoices = summary.get("Invoices").unwrap();
    assert_eq!(invoices.status, TableRunStatus::Failed);
    assert_eq!(invoices.failure, Some(FailureKind::ExportFailed));
    assert!(invoices
        .last_error
        .as_deref()
        .unwrap()
        .contains("scan of Invoices denied"));
}

#[test]
fn test_object_path_matches_store_layout() {
    let store = FsObjectStore::new("/data");
    assert!(store.object_path("bkt", "Orders-1").ends_with("Orders-1"));
}
