//! Configuration data model and validation

use crate::executor::ProbeMode;
use crate::types::{AppError, ImplementationName, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interop runner root: an http(s) URL or a local mirror directory
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding run artifacts and the run manifest
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for summary reports (defaults to `<data_dir>/reports`)
    #[serde(default, alias = "figure_dir")]
    pub report_dir: Option<PathBuf>,

    /// Implementations published as clients
    #[serde(default)]
    pub clients: Vec<ImplementationName>,

    /// Implementations published as servers
    #[serde(default)]
    pub servers: Vec<ImplementationName>,

    /// Per-request timeout for the HTTP fetcher
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Maximum number of server rows collected at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Optional proxy for every HTTP request
    #[serde(default)]
    pub proxy: Option<String>,

    /// Abort a run on malformed output instead of truncating the pair
    #[serde(default)]
    pub strict: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_dir: default_data_dir(),
            report_dir: None,
            clients: Vec::new(),
            servers: Vec::new(),
            timeout_seconds: default_timeout_secs(),
            concurrency: default_concurrency(),
            proxy: None,
            strict: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::config(format!("Invalid config file '{}': {}", path.display(), e))
        })
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Directory for summary reports
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(crate::defaults::DEFAULT_REPORT_SUBDIR))
    }

    /// Probe policy selected by the `strict` flag
    pub fn probe_mode(&self) -> ProbeMode {
        if self.strict {
            ProbeMode::Strict
        } else {
            ProbeMode::Lenient
        }
    }

    /// Implementations present both as client and as server, sorted
    pub fn implementations(&self) -> Vec<ImplementationName> {
        let servers: BTreeSet<&ImplementationName> = self.servers.iter().collect();
        let both: BTreeSet<&ImplementationName> = self
            .clients
            .iter()
            .filter(|client| servers.contains(client))
            .collect();
        both.into_iter().cloned().collect()
    }

    /// Implementations listed on only one side, sorted
    pub fn excluded_implementations(&self) -> Vec<ImplementationName> {
        let clients: BTreeSet<&ImplementationName> = self.clients.iter().collect();
        let servers: BTreeSet<&ImplementationName> = self.servers.iter().collect();
        clients
            .symmetric_difference(&servers)
            .map(|name| (*name).clone())
            .collect()
    }

    /// Whether `base_url` names an http(s) endpoint rather than a local mirror
    pub fn is_remote(&self) -> bool {
        matches!(
            url::Url::parse(&self.base_url),
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https"
        )
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        if let Ok(parsed) = url::Url::parse(&self.base_url) {
            // Single-letter schemes are Windows drive letters, not URLs
            let is_drive = parsed.scheme().len() == 1;
            if !is_drive && parsed.scheme() != "http" && parsed.scheme() != "https" && parsed.scheme() != "file" {
                return Err(AppError::config(format!(
                    "Unsupported base URL scheme '{}' in '{}'",
                    parsed.scheme(),
                    self.base_url
                )));
            }
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::config("Data directory cannot be empty"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 600 {
            return Err(AppError::config("Timeout cannot exceed 600 seconds"));
        }

        if self.concurrency == 0 {
            return Err(AppError::config("Concurrency must be greater than 0"));
        }

        if let Some(proxy) = &self.proxy {
            if let Err(e) = url::Url::parse(proxy) {
                return Err(AppError::config(format!("Invalid proxy URL '{}': {}", proxy, e)));
            }
        }

        if self.implementations().is_empty() {
            return Err(AppError::config(
                "No implementation appears in both 'clients' and 'servers'",
            ));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("QIC_BASE_URL") {
            self.base_url = base_url.trim().to_string();
        }

        if let Ok(data_dir) = std::env::var("QIC_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir.trim());
        }

        if let Ok(report_dir) = std::env::var("QIC_REPORT_DIR") {
            self.report_dir = Some(PathBuf::from(report_dir.trim()));
        }

        if let Ok(timeout) = std::env::var("QIC_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid QIC_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(concurrency) = std::env::var("QIC_CONCURRENCY") {
            self.concurrency = concurrency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid QIC_CONCURRENCY value '{}': {}", concurrency, e)))?;
        }

        if let Ok(proxy) = std::env::var("QIC_PROXY") {
            let proxy = proxy.trim();
            self.proxy = if proxy.is_empty() { None } else { Some(proxy.to_string()) };
        }

        if let Ok(strict) = std::env::var("QIC_STRICT") {
            self.strict = strict.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid QIC_STRICT value '{}': {}", strict, e)))?;
        }

        if let Ok(enable_color) = std::env::var("QIC_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid QIC_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_DATA_DIR)
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_concurrency() -> usize {
    crate::defaults::default_concurrency()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            clients: vec!["quiche".into(), "lsquic".into(), "ngtcp2".into()],
            servers: vec!["lsquic".into(), "quiche".into(), "msquic".into()],
            ..Config::default()
        }
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_default_config_has_no_implementations() {
        let error = Config::default().validate().unwrap_err();
        assert!(matches!(error, AppError::Config(_)));
    }

    #[test]
    fn test_implementations_are_intersection_sorted() {
        let config = sample();
        assert_eq!(config.implementations(), vec!["lsquic".to_string(), "quiche".to_string()]);
        assert_eq!(config.excluded_implementations(), vec!["msquic".to_string(), "ngtcp2".to_string()]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let config = Config {
            clients: vec!["a".into(), "a".into()],
            servers: vec!["a".into()],
            ..Config::default()
        };
        assert_eq!(config.implementations(), vec!["a".to_string()]);
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let mut config = sample();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_invalid() {
        let mut config = sample();
        config.concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_scheme_invalid() {
        let mut config = sample();
        config.base_url = "ftp://example.com/logs".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_base_is_not_remote() {
        let mut config = sample();
        assert!(config.is_remote());
        config.base_url = "./mirror".to_string();
        assert!(!config.is_remote());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_dir_defaults_under_data_dir() {
        let mut config = sample();
        config.data_dir = PathBuf::from("/tmp/qic");
        assert_eq!(config.report_dir(), PathBuf::from("/tmp/qic/reports"));
        config.report_dir = Some(PathBuf::from("/tmp/figures"));
        assert_eq!(config.report_dir(), PathBuf::from("/tmp/figures"));
    }

    #[test]
    fn test_probe_mode_follows_strict() {
        let mut config = sample();
        assert_eq!(config.probe_mode(), ProbeMode::Lenient);
        config.strict = true;
        assert_eq!(config.probe_mode(), ProbeMode::Strict);
    }

    #[test]
    fn test_parses_crawler_config_file_shape() {
        let text = r#"{
            "base_url": "https://interop.example.org",
            "data_dir": "data",
            "figure_dir": "figures",
            "clients": ["quiche", "lsquic"],
            "servers": ["quiche"]
        }"#;
        let config: Config = serde_json::from_str(text).unwrap();
        assert_eq!(config.report_dir, Some(PathBuf::from("figures")));
        assert_eq!(config.implementations(), vec!["quiche".to_string()]);
        assert_eq!(config.timeout_seconds, crate::defaults::DEFAULT_TIMEOUT.as_secs());
        assert!(!config.strict);
    }
}
