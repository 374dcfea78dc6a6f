//! Backup-export workflow orchestration
//!
//! This module drives every table of a [`WorkflowRequest`](crate::domain::WorkflowRequest)
//! through its own state machine:
//! - Locating the table's latest backup
//! - Starting the export
//! - Polling the export status until it is terminal
//! - Collecting the terminal states into a [`WorkflowSummary`]

pub mod options;
pub mod orchestrator;
pub mod summary;
mod table_run;

pub use options::WorkflowOptions;
pub use orchestrator::WorkflowOrchestrator;
pub use summary::WorkflowSummary;
