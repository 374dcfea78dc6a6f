//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FerryConfig;
use crate::config::secret_string;
use crate::domain::errors::FerryError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FerryConfig
/// 4. Applies environment variable overrides (FERRY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is not set, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ferry::config::loader::load_config;
///
/// let config = load_config("ferry.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FerryConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FerryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FerryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text, with substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<FerryConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: FerryConfig = toml::from_str(&contents)
        .map_err(|e| FerryError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        FerryError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| FerryError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(FerryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        FerryError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using FERRY_* prefix
///
/// Environment variables follow the pattern: FERRY_<SECTION>_<KEY>
/// For example: FERRY_WORKFLOW_DESTINATION, FERRY_EXPORTER_ENDPOINT
fn apply_env_overrides(config: &mut FerryConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("FERRY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Workflow overrides
    if let Ok(val) = std::env::var("FERRY_WORKFLOW_DESTINATION") {
        config.workflow.destination = val;
    }
    if let Ok(val) = std::env::var("FERRY_WORKFLOW_TABLE_IDS") {
        config.workflow.table_ids = split_list(&val);
    }
    if let Ok(val) = std::env::var("FERRY_WORKFLOW_POLL_INTERVAL_SECONDS") {
        config.workflow.poll_interval_seconds =
            parse_override("FERRY_WORKFLOW_POLL_INTERVAL_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("FERRY_WORKFLOW_STEP_TIMEOUT_SECONDS") {
        config.workflow.step_timeout_seconds =
            parse_override("FERRY_WORKFLOW_STEP_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("FERRY_WORKFLOW_MAX_POLL_ATTEMPTS") {
        config.workflow.max_poll_attempts =
            Some(parse_override("FERRY_WORKFLOW_MAX_POLL_ATTEMPTS", &val)?);
    }
    if let Ok(val) = std::env::var("FERRY_WORKFLOW_MAX_CONCURRENCY") {
        config.workflow.max_concurrency =
            Some(parse_override("FERRY_WORKFLOW_MAX_CONCURRENCY", &val)?);
    }

    // Remote function overrides
    if let Ok(val) = std::env::var("FERRY_LOCATOR_ENDPOINT") {
        config.locator.endpoint = val;
    }
    if let Ok(val) = std::env::var("FERRY_LOCATOR_API_KEY") {
        config.locator.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("FERRY_EXPORTER_ENDPOINT") {
        config.exporter.endpoint = val;
    }
    if let Ok(val) = std::env::var("FERRY_EXPORTER_STATUS_ENDPOINT") {
        config.exporter.status_endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("FERRY_EXPORTER_API_KEY") {
        config.exporter.api_key = Some(secret_string(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("FERRY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("FERRY_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("FERRY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("FERRY_UNIT_TEST_VAR", "test_value");
        let input = "api_key = \"${FERRY_UNIT_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"\n");
        std::env::remove_var("FERRY_UNIT_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("FERRY_UNIT_MISSING_VAR");
        let input = "api_key = \"${FERRY_UNIT_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("FERRY_UNIT_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("FERRY_UNIT_COMMENTED_VAR");
        let input = "# api_key = \"${FERRY_UNIT_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" A, B ,,C "), vec!["A", "B", "C"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-ferry.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[workflow]
destination = "backups-bucket"
table_ids = ["Orders"]

[locator]
endpoint = "https://functions.example.com/locate"

[exporter]
endpoint = "https://functions.example.com/export"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.workflow.destination, "backups-bucket");
        assert_eq!(config.workflow.poll_interval_seconds, 30);
        assert_eq!(config.application.log_level, "info");
    }
}
