//! External system integrations for Ferry.
//!
//! This module provides adapters for the two remote collaborators the
//! workflow calls into:
//!
//! - [`backup`] - finding the latest backup of a table
//! - [`export`] - exporting a table's contents to an object store
//! - [`remote`] - the shared HTTP client for remote function calls
//!
//! # Design Pattern
//!
//! Each collaborator is a trait ([`backup::BackupLocator`], [`export::Exporter`])
//! injected into the orchestrator, so the workflow can be driven by remote
//! functions in production and by in-process implementations in tests.
//!
//! ```rust,no_run
//! use ferry::adapters::backup::HttpBackupLocator;
//! use ferry::adapters::export::HttpExporter;
//! use ferry::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ferry.toml")?;
//! let locator = HttpBackupLocator::new(&config.locator)?;
//! let exporter = HttpExporter::new(&config.exporter)?;
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod export;
pub mod remote;
