//! Configuration schema types
//!
//! This module defines the configuration structure for Ferry.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

/// Main Ferry configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FerryConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Workflow settings (what to export, where, and how to poll)
    pub workflow: WorkflowConfig,

    /// Remote backup lookup function
    pub locator: RemoteFunctionConfig,

    /// Remote export function
    pub exporter: ExporterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FerryConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.workflow.validate()?;
        self.locator.validate("locator")?;
        self.exporter.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Destination bucket receiving the exported objects
    pub destination: String,

    /// Tables to export; may be left empty and supplied on the command line
    #[serde(default)]
    pub table_ids: Vec<String>,

    /// Wait between export status checks
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,

    /// Budget for each remote call (lookup, export, status check)
    #[serde(default = "default_step_timeout_seconds")]
    pub step_timeout_seconds: u64,

    /// Give up on a table after this many non-terminal status checks.
    /// Unset means poll until the export reaches a terminal status.
    #[serde(default)]
    pub max_poll_attempts: Option<u32>,

    /// Cap on tables processed at once. Unset means no cap.
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl WorkflowConfig {
    fn validate(&self) -> Result<(), String> {
        if self.destination.trim().is_empty() {
            return Err("workflow.destination cannot be empty".to_string());
        }

        if let Some(blank) = self.table_ids.iter().position(|t| t.trim().is_empty()) {
            return Err(format!("workflow.table_ids[{blank}] cannot be empty"));
        }

        if self.poll_interval_seconds == 0 {
            return Err("workflow.poll_interval_seconds must be > 0".to_string());
        }

        if self.step_timeout_seconds == 0 {
            return Err("workflow.step_timeout_seconds must be > 0".to_string());
        }

        if self.max_poll_attempts == Some(0) {
            return Err("workflow.max_poll_attempts must be > 0 when set".to_string());
        }

        if self.max_concurrency == Some(0) {
            return Err("workflow.max_concurrency must be > 0 when set".to_string());
        }

        if let Some(limit) = self.max_concurrency.filter(|&l| l > Semaphore::MAX_PERMITS) {
            return Err(format!(
                "workflow.max_concurrency must be <= {} (got {limit})",
                Semaphore::MAX_PERMITS
            ));
        }

        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            destination: String::new(),
            table_ids: vec![],
            poll_interval_seconds: default_poll_interval_seconds(),
            step_timeout_seconds: default_step_timeout_seconds(),
            max_poll_attempts: None,
            max_concurrency: None,
        }
    }
}

/// Remote function endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFunctionConfig {
    /// URL the request is POSTed to
    pub endpoint: String,

    /// Bearer token sent with each request (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_locator_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl RemoteFunctionConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        validate_endpoint(section, "endpoint", &self.endpoint)?;
        if self.timeout_seconds == 0 {
            return Err(format!("{section}.timeout_seconds must be > 0"));
        }
        Ok(())
    }
}

/// Export function configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// URL the export request is POSTed to
    pub endpoint: String,

    /// URL for re-checking export status. Unset means the status returned by
    /// the export call is final.
    #[serde(default)]
    pub status_endpoint: Option<String>,

    /// Bearer token sent with each request (optional)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_exporter_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ExporterConfig {
    fn validate(&self) -> Result<(), String> {
        validate_endpoint("exporter", "endpoint", &self.endpoint)?;
        if let Some(status_endpoint) = &self.status_endpoint {
            validate_endpoint("exporter", "status_endpoint", status_endpoint)?;
        }
        if self.timeout_seconds == 0 {
            return Err("exporter.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

fn validate_endpoint(section: &str, field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{section}.{field} cannot be empty"));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{section}.{field} must start with http:// or https://"));
    }
    Ok(())
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_seconds() -> u64 {
    30
}

fn default_step_timeout_seconds() -> u64 {
    900
}

fn default_locator_timeout_seconds() -> u64 {
    60
}

fn default_exporter_timeout_seconds() -> u64 {
    900
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
