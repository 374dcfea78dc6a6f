//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

const SAMPLE_CONFIG: &str = r#"# Ferry Configuration File
# Exports table backups to an object store and waits for completion

[application]
log_level = "info"

[workflow]
# Bucket (or other object-store location) receiving the exports
destination = "backups-bucket"
table_ids = ["Orders", "Customers"]
poll_interval_seconds = 30
step_timeout_seconds = 900
# Uncomment to stop polling an export that never finishes
# max_poll_attempts = 120
# Uncomment to limit how many tables run at once
# max_concurrency = 8

[locator]
endpoint = "https://functions.example.com/find-latest-backup"
api_key = "${FERRY_REMOTE_API_KEY}"
timeout_seconds = 60

[exporter]
endpoint = "https://functions.example.com/export-table"
# status_endpoint = "https://functions.example.com/export-status"
api_key = "${FERRY_REMOTE_API_KEY}"
timeout_seconds = 900

[logging]
local_enabled = false
local_path = "/var/log/ferry"
local_rotation = "daily"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ferry.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Ferry configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your endpoints and tables", self.output);
                println!("  2. Set FERRY_REMOTE_API_KEY in the environment or a .env file");
                println!("  3. Validate configuration: ferry validate-config");
                println!("  4. Run export: ferry export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}
