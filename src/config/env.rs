//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load the given env file if it exists; variables already set win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using config file and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# QUIC Interop Crawler Configuration
#
# Values here override the JSON config file and are themselves
# overridden by command-line arguments.

# Interop runner root: an http(s) URL or a local mirror directory
# QIC_BASE_URL=https://interop.seemann.io

# Where run artifacts and manifest.json are stored
# QIC_DATA_DIR=data

# Where summary tables are written (default: <data_dir>/reports)
# QIC_REPORT_DIR=data/reports

# Request timeout in seconds (1-600)
# QIC_TIMEOUT_SECONDS=30

# Maximum number of servers crawled at once
# QIC_CONCURRENCY=8

# Proxy for every HTTP request
# QIC_PROXY=http://127.0.0.1:7890

# Abort a run on malformed output instead of truncating the pair (true/false)
# QIC_STRICT=false

# Enable colored output (true/false)
# QIC_ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "QIC_BASE_URL" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("QIC_BASE_URL cannot be empty"));
                }
            }
            "QIC_PROXY" => {
                if !value.trim().is_empty() {
                    url::Url::parse(value.trim())
                        .map_err(|e| AppError::config(format!("Invalid QIC_PROXY value '{}': {}", value, e)))?;
                }
            }
            "QIC_TIMEOUT_SECONDS" => {
                let timeout: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid QIC_TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 600 {
                    return Err(AppError::config(format!(
                        "QIC_TIMEOUT_SECONDS must be between 1 and 600, got: {}",
                        timeout
                    )));
                }
            }
            "QIC_CONCURRENCY" => {
                let concurrency: usize = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid QIC_CONCURRENCY value '{}': {}", value, e)))?;
                if concurrency == 0 {
                    return Err(AppError::config("QIC_CONCURRENCY must be greater than 0"));
                }
            }
            "QIC_STRICT" | "QIC_ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("QIC_BASE_URL", "Interop runner root URL or mirror directory", "https://interop.seemann.io"),
            ("QIC_DATA_DIR", "Directory for run artifacts", "data"),
            ("QIC_REPORT_DIR", "Directory for summary tables", "data/reports"),
            ("QIC_TIMEOUT_SECONDS", "Request timeout in seconds (1-600)", "30"),
            ("QIC_CONCURRENCY", "Servers crawled at once", "8"),
            ("QIC_PROXY", "HTTP proxy URL", "http://127.0.0.1:7890"),
            ("QIC_STRICT", "Abort runs on malformed output", "false"),
            ("QIC_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<20} {}\n", var, description));
            help.push_str(&format!("  {:<20} Example: {}\n\n", "", example));
        }

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(var_name, _, _)| {
                let value = std::env::var(var_name).ok()?;
                Self::validate_env_var(var_name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}
