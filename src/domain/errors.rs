//! Domain error types
//!
//! This module defines the error hierarchy for Ferry. Errors raised by remote
//! collaborators are converted into these types at the adapter boundary so
//! that no third-party client types leak into the core.

use std::time::Duration;
use thiserror::Error;

/// Main Ferry error type
///
/// This is the primary error type used throughout the application.
/// Per-table workflow failures are *not* reported through this type; they are
/// recorded on the table's run state instead.
#[derive(Debug, Error)]
pub enum FerryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backup lookup errors
    #[error("Backup lookup error: {0}")]
    Locate(#[from] LocateError),

    /// Remote call errors
    #[error("Remote call error: {0}")]
    RemoteCall(#[from] RemoteCallError),

    /// A table run was asked to move backwards or out of a terminal state
    #[error("Invalid state transition for table '{table_id}': {from} -> {to}")]
    InvalidTransition {
        table_id: String,
        from: String,
        to: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Object store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors returned by a backup locator
#[derive(Debug, Error)]
pub enum LocateError {
    /// The catalog holds no backup for the table
    #[error("No backup found for table '{table_id}'")]
    NotFound { table_id: String },

    /// The catalog could not be queried
    #[error("{0}")]
    Remote(String),
}

impl From<RemoteCallError> for LocateError {
    fn from(err: RemoteCallError) -> Self {
        LocateError::Remote(err.to_string())
    }
}

/// Failures of a single remote call (locate, export, status check)
///
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Clone, Error)]
pub enum RemoteCallError {
    /// The request never produced a response
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The call exceeded its step budget
    #[error("Remote call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The remote side answered with a status the contract does not allow
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The response body did not match the contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for FerryError {
    fn from(err: std::io::Error) -> Self {
        FerryError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FerryError {
    fn from(err: serde_json::Error) -> Self {
        FerryError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FerryError {
    fn from(err: toml::de::Error) -> Self {
        FerryError::Configuration(format!("TOML parse error: {err}"))
    }
}
