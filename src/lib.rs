// Ferry - Table Backup Export Orchestrator
// Copyright (c) 2025 Ferry Contributors
// Licensed under the MIT License

//! # Ferry - Table Backup Export Orchestrator
//!
//! Ferry exports a batch of tables to an object store and tracks every export
//! until it reaches a terminal state.
//!
//! ## Overview
//!
//! For each requested table, independently and concurrently, Ferry:
//! - **Locates** the table's most recent backup
//! - **Exports** the table's current contents to the destination as one object
//! - **Polls** the export status on a fixed interval until it succeeds or fails
//!
//! A failing table never affects its siblings. A run returns only once every
//! table is either `Succeeded` or `Failed`.
//!
//! ## Architecture
//!
//! Ferry follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Workflow orchestration and per-table state machines
//! - [`adapters`] - Backup locators, exporters and the remote function client
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferry::adapters::backup::HttpBackupLocator;
//! use ferry::adapters::export::HttpExporter;
//! use ferry::config::load_config;
//! use ferry::core::workflow::{WorkflowOptions, WorkflowOrchestrator};
//! use ferry::domain::WorkflowRequest;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ferry.toml")?;
//!
//!     let orchestrator = WorkflowOrchestrator::new(
//!         Arc::new(HttpBackupLocator::new(&config.locator)?),
//!         Arc::new(HttpExporter::new(&config.exporter)?),
//!         WorkflowOptions::from_config(&config.workflow),
//!     );
//!
//!     let request = WorkflowRequest::from_strings(
//!         &config.workflow.table_ids,
//!         &config.workflow.destination,
//!     )?;
//!     let summary = orchestrator.run(&request).await;
//!
//!     for (table_id, state) in &summary.tables {
//!         println!("{table_id}: {}", state.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Per-table failures are recorded on each table's
//! [`TableRunState`](domain::TableRunState). Everything else uses
//! [`domain::FerryError`]:
//!
//! ```rust,no_run
//! use ferry::domain::FerryError;
//!
//! fn example() -> Result<(), FerryError> {
//!     let config = ferry::config::load_config("ferry.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
