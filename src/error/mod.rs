//! Error handling for the interop crawler
//!
//! Two layers live here. [`FetchError`] and [`ExtractError`] are the closed
//! set of outcomes a single sub-test probe can observe; the probe decides
//! locally which of them end a sequence and which abort the run.
//! [`AppError`] is what crosses module boundaries and reaches the user.

use thiserror::Error;

/// Failure to retrieve one address through a fetcher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The address does not exist (HTTP 404, missing file)
    #[error("not found: {address}")]
    NotFound { address: String },

    /// The request reached the source but did not yield a usable body
    #[error("transport error for {address}: {reason}")]
    Transport { address: String, reason: String },

    /// The source itself cannot be reached at all
    #[error("source unreachable for {address}: {reason}")]
    Unreachable { address: String, reason: String },
}

impl FetchError {
    pub fn not_found<S: Into<String>>(address: S) -> Self {
        Self::NotFound { address: address.into() }
    }

    pub fn transport<S: Into<String>, R: Into<String>>(address: S, reason: R) -> Self {
        Self::Transport { address: address.into(), reason: reason.into() }
    }

    pub fn unreachable<S: Into<String>, R: Into<String>>(address: S, reason: R) -> Self {
        Self::Unreachable { address: address.into(), reason: reason.into() }
    }

    /// Address the failed fetch was aimed at
    pub fn address(&self) -> &str {
        match self {
            Self::NotFound { address }
            | Self::Transport { address, .. }
            | Self::Unreachable { address, .. } => address,
        }
    }

    /// Short tag used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Transport { .. } => "transport",
            Self::Unreachable { .. } => "unreachable",
        }
    }
}

/// Failure to pull a result value out of sub-test output
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// No `Goodput: <n> kbps` on the last line, or `<n>` is not an integer
    #[error("result line not found")]
    ResultNotFound,
}

/// Custom error types for the interop crawler
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (URLs, JSON, run identifiers)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Fetch failures that escaped the probe's stop policy
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Artifact or manifest could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A run's matrix could not be assembled completely
    #[error("Aggregation error: {0}")]
    Aggregation(String),

    /// Summary report generation errors
    #[error("Report error: {0}")]
    Report(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence(message.into())
    }

    /// Create a new aggregation error
    pub fn aggregation<S: Into<String>>(message: S) -> Self {
        Self::Aggregation(message.into())
    }

    /// Create a new report error
    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::Report(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Fetch(_) => "FETCH",
            Self::Persistence(_) => "PERSIST",
            Self::Aggregation(_) => "AGGREGATE",
            Self::Report(_) => "REPORT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::Fetch(_) => 2,
            Self::Aggregation(_) => 3,
            Self::Io(_) | Self::Persistence(_) => 5,
            Self::Report(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Fetch(_) | Self::Aggregation(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Persistence(_) | Self::Report(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        Self::config(format!("HTTP client error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(error: chrono::ParseError) -> Self {
        Self::parse(format!("Timestamp parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;
