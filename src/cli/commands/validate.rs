//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Ferry configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `load_config` validates as it loads, so a loaded configuration is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let optional = |v: Option<String>| v.unwrap_or_else(|| "unbounded".to_string());

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Destination: {}", config.workflow.destination);
        println!("  Tables: {:?}", config.workflow.table_ids);
        println!("  Poll Interval: {}s", config.workflow.poll_interval_seconds);
        println!("  Step Timeout: {}s", config.workflow.step_timeout_seconds);
        println!(
            "  Max Poll Attempts: {}",
            optional(config.workflow.max_poll_attempts.map(|n| n.to_string()))
        );
        println!(
            "  Max Concurrency: {}",
            optional(config.workflow.max_concurrency.map(|n| n.to_string()))
        );
        println!("  Backup Locator: {}", config.locator.endpoint);
        println!("  Exporter: {}", config.exporter.endpoint);
        if let Some(status) = &config.exporter.status_endpoint {
            println!("  Export Status: {status}");
        }
        if config.workflow.table_ids.is_empty() {
            println!();
            println!("⚠️  No tables configured; pass --tables to the export command");
        }
        println!();
        Ok(0)
    }
}
