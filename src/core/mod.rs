//! Core business logic for Ferry.
//!
//! # Modules
//!
//! - [`workflow`] - per-table backup export state machines and their orchestration
//!
//! # Workflow
//!
//! For every requested table, concurrently:
//!
//! 1. **Locate**: find the table's latest backup
//! 2. **Export**: start writing the table to the destination
//! 3. **Wait**: sleep the poll interval, check the export status, repeat until terminal
//! 4. **Report**: collect the terminal states into a summary
//!
//! # Example
//!
//! ```rust,no_run
//! use ferry::adapters::backup::HttpBackupLocator;
//! use ferry::adapters::export::HttpExporter;
//! use ferry::config::load_config;
//! use ferry::core::workflow::{WorkflowOptions, WorkflowOrchestrator};
//! use ferry::domain::WorkflowRequest;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ferry.toml")?;
//!
//! let orchestrator = WorkflowOrchestrator::new(
//!     Arc::new(HttpBackupLocator::new(&config.locator)?),
//!     Arc::new(HttpExporter::new(&config.exporter)?),
//!     WorkflowOptions::from_config(&config.workflow),
//! );
//!
//! let request = WorkflowRequest::from_strings(["Orders"], "backups-bucket")?;
//! let summary = orchestrator.run(&request).await;
//!
//! println!("Succeeded: {}", summary.succeeded());
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod workflow;
