//! Configuration validation utilities and rules

use crate::{error::Result, models::Config};

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    ///
    /// Hard errors come from [`Config::validate`]; everything returned here
    /// is advisory.
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_implementations(config));
        warnings.extend(Self::validate_source(config));
        warnings.extend(Self::validate_performance_settings(config));
        Ok(warnings)
    }

    /// Names listed on only one side are never crawled
    fn validate_implementations(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings: Vec<ValidationWarning> = config
            .excluded_implementations()
            .into_iter()
            .map(|name| {
                let side = if config.clients.contains(&name) { "client" } else { "server" };
                ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("'{}' is only listed as a {} and will not be crawled", name, side),
                )
            })
            .collect();

        let count = config.implementations().len();
        if count == 1 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Only one implementation is crawled; matrices will have a single cell".to_string(),
            ));
        }

        warnings
    }

    fn validate_source(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Ok(parsed) = url::Url::parse(&config.base_url) {
            if parsed.scheme() == "http" {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Base URL '{}' uses plain HTTP", config.base_url),
                ));
            }
        }

        if config.proxy.is_some() && !config.is_remote() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Proxy is ignored for a local mirror".to_string(),
            ));
        }

        warnings
    }

    /// Validate performance-related settings
    fn validate_performance_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.timeout_seconds < 5 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Timeout of {}s may cut off slow sub-test outputs (recommended: >= 5)",
                    config.timeout_seconds
                ),
            ));
        }

        let servers = config.implementations().len();
        if servers > 0 && config.concurrency > servers {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Concurrency of {} exceeds the {} servers crawled per run",
                    config.concurrency, servers
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> colored::Color {
        match self {
            Self::Info => colored::Color::Blue,
            Self::Warning => colored::Color::Yellow,
            Self::Error => colored::Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            format!("[{}] {}", self.level.as_str().color(self.level.color()).bold(), self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
