//! Configuration management for Ferry.
//!
//! Ferry reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FERRY_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`WorkflowConfig`] - tables, destination, poll interval, step timeout, limits
//! - [`RemoteFunctionConfig`] - backup lookup endpoint
//! - [`ExporterConfig`] - export endpoint and optional status endpoint
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [workflow]
//! destination = "backups-bucket"
//! table_ids = ["Orders", "Customers"]
//! poll_interval_seconds = 30
//!
//! [locator]
//! endpoint = "https://functions.example.com/find-latest-backup"
//! api_key = "${FERRY_REMOTE_API_KEY}"
//!
//! [exporter]
//! endpoint = "https://functions.example.com/export-table"
//! api_key = "${FERRY_REMOTE_API_KEY}"
//! ```
//!
//! ```rust,no_run
//! use ferry::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ferry.toml")?;
//! println!("Destination: {}", config.workflow.destination);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config, split_list};
pub use schema::{
    ApplicationConfig, ExporterConfig, FerryConfig, LoggingConfig, RemoteFunctionConfig,
    WorkflowConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
