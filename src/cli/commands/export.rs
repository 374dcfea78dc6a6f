//! Export command implementation
//!
//! This module implements the `export` command: locate, export and wait on
//! every configured table, then report the per-table outcome.

use crate::adapters::backup::HttpBackupLocator;
use crate::adapters::export::HttpExporter;
use crate::config::{load_config, split_list, FerryConfig};
use crate::core::workflow::{WorkflowOptions, WorkflowOrchestrator, WorkflowSummary};
use crate::domain::{TableRunStatus, WorkflowRequest};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override table ID(s) to export (comma-separated)
    #[arg(long)]
    pub tables: Option<String>,

    /// Override the destination bucket
    #[arg(long)]
    pub destination: Option<String>,

    /// Override seconds between export status checks
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Fail a table after this many in-progress status checks
    #[arg(long, value_name = "N")]
    pub max_poll_attempts: Option<u32>,

    /// Process at most this many tables at once
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Write the run summary as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        if config.workflow.table_ids.is_empty() {
            tracing::error!("No tables to export");
            eprintln!("No tables to export: set workflow.table_ids or pass --tables");
            return Ok(2);
        }

        let request =
            match WorkflowRequest::from_strings(&config.workflow.table_ids, &config.workflow.destination) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Invalid workflow request: {e}");
                    return Ok(2);
                }
            };

        let orchestrator = match build_orchestrator(&config) {
            Ok(o) => o.with_shutdown(shutdown_signal),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create remote function clients");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4); // Initialization error exit code
            }
        };

        println!("🚀 Exporting {} table(s) to {}", request.table_ids().len(), request.destination());
        println!();

        let summary = orchestrator.run(&request).await;

        print_summary(&summary);

        if let Some(path) = &self.output {
            let report = serde_json::to_string_pretty(&summary)?;
            if let Err(e) = tokio::fs::write(path, report).await {
                tracing::error!(path = %path, error = %e, "Failed to write run summary");
                eprintln!("Failed to write run summary to {path}: {e}");
                return Ok(5); // Fatal error exit code
            }
            println!("📝 Run summary written to {path}");
        }

        Ok(exit_code(&summary))
    }

    /// Apply command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut FerryConfig) {
        if let Some(tables) = &self.tables {
            let ids = split_list(tables);
            tracing::info!(table_ids = ?ids, "Overriding table IDs from CLI");
            config.workflow.table_ids = ids;
        }

        if let Some(destination) = &self.destination {
            tracing::info!(destination = %destination, "Overriding destination from CLI");
            config.workflow.destination = destination.clone();
        }

        if let Some(secs) = self.poll_interval {
            config.workflow.poll_interval_seconds = secs;
        }

        if self.max_poll_attempts.is_some() {
            config.workflow.max_poll_attempts = self.max_poll_attempts;
        }

        if self.max_concurrency.is_some() {
            config.workflow.max_concurrency = self.max_concurrency;
        }
    }
}

fn build_orchestrator(config: &FerryConfig) -> crate::domain::Result<WorkflowOrchestrator> {
    let locator = HttpBackupLocator::new(&config.locator)?;
    let exporter = HttpExporter::new(&config.exporter)?;
    tracing::debug!(
        locator = %locator.endpoint(),
        exporter = %exporter.endpoint(),
        "Remote function clients ready"
    );

    Ok(WorkflowOrchestrator::new(
        Arc::new(locator),
        Arc::new(exporter),
        WorkflowOptions::from_config(&config.workflow),
    ))
}

fn print_summary(summary: &WorkflowSummary) {
    println!("📊 Export Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Destination: {}", summary.destination);
    println!("  Tables: {}", summary.tables.len());
    println!("  Succeeded: {}", summary.succeeded());
    println!("  Failed: {}", summary.failed());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    for state in summary.tables.values() {
        match state.status {
            TableRunStatus::Succeeded => {
                let key = state
                    .export_handle
                    .as_ref()
                    .map(|h| h.destination_path.as_str())
                    .unwrap_or("-");
                println!("  ✅ {} -> {}", state.table_id, key);
            }
            _ => {
                let kind = state
                    .failure
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!(
                    "  ❌ {} ({}): {}",
                    state.table_id,
                    kind,
                    state.last_error.as_deref().unwrap_or("")
                );
            }
        }
    }
    println!();
}

/// Process exit code for a finished run
fn exit_code(summary: &WorkflowSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Export interrupted. Unfinished tables were marked cancelled.");
        tracing::info!("Export interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else {
        println!("⚠️  Export completed with failures");
        1 // Partial success
    }
}
