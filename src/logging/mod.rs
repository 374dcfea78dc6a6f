//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logs with rotation
//! - Workflow event macros with consistent field names
//!
//! # Example
//!
//! ```no_run
//! use ferry::logging::init_logging;
//! use ferry::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a table moving to a new workflow status
///
/// # Example
///
/// ```no_run
/// use ferry::log_table_transition;
/// use ferry::domain::{TableId, TableRunStatus};
///
/// let table_id = TableId::new("Orders").unwrap();
/// log_table_transition!(&table_id, TableRunStatus::Pending, TableRunStatus::LocatingBackup);
/// ```
#[macro_export]
macro_rules! log_table_transition {
    ($table_id:expr, $from:expr, $to:expr) => {
        tracing::info!(
            table_id = %$table_id,
            from = %$from,
            to = %$to,
            "Table status changed"
        );
    };
}

/// Log one export status check
///
/// # Example
///
/// ```no_run
/// use ferry::log_poll_attempt;
/// use ferry::domain::{ExportStatus, TableId};
///
/// let table_id = TableId::new("Orders").unwrap();
/// log_poll_attempt!(&table_id, 3, ExportStatus::InProgress);
/// ```
#[macro_export]
macro_rules! log_poll_attempt {
    ($table_id:expr, $attempt:expr, $status:expr) => {
        tracing::debug!(
            table_id = %$table_id,
            attempt = $attempt,
            status = %$status,
            "Checked export status"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ferry::log_error_with_context;
/// use ferry::domain::FerryError;
///
/// let error = FerryError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
