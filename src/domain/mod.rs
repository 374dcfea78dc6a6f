//! Domain models and types for Ferry.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`TableId`])
//! - **Backup and export values** ([`BackupRef`], [`ExportHandle`], [`ExportOutcome`], [`ExportStatus`])
//! - **Run state** ([`TableRunState`], [`TableRunStatus`], [`FailureKind`], [`WorkflowRequest`])
//! - **Error types** ([`FerryError`], [`LocateError`], [`RemoteCallError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use ferry::domain::{TableRunState, TableRunStatus, TableId};
//!
//! # fn example() -> ferry::domain::Result<()> {
//! let mut state = TableRunState::new(TableId::new("Orders").map_err(ferry::domain::FerryError::Validation)?);
//! state.advance(TableRunStatus::LocatingBackup)?;
//!
//! // Moving backwards is rejected
//! assert!(state.advance(TableRunStatus::Pending).is_err());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod errors;
pub mod export;
pub mod ids;
pub mod result;
pub mod run;

pub use backup::{BackupRef, BackupSummary};
pub use errors::{FerryError, LocateError, RemoteCallError};
pub use export::{ExportHandle, ExportOutcome, ExportStatus, StatusCheck};
pub use ids::TableId;
pub use result::Result;
pub use run::{FailureKind, TableRunState, TableRunStatus, WorkflowRequest};
