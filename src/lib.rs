//! QUIC Interop Crawler
//!
//! Discovers measurement runs published by the QUIC interop runner, probes
//! the goodput and cross-traffic sub-test outputs of every (server, client)
//! pair, and stores each run's server x client matrices as one JSON
//! artifact while keeping a manifest of processed runs.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod naming;
pub mod output;
pub mod report;
pub mod scanner;
pub mod stats;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, FetchError, Result};
pub use executor::{AggregationConfig, MatrixAggregator, PairCollector, ProbeMode, SubTestProbe};
pub use extract::extract_result;
pub use fetch::{create_fetcher, Fetcher, HttpFetcher, LocalFetcher};
pub use models::{Config, Matrix, RunArtifact};
pub use naming::artifact_file_name;
pub use scanner::{FetcherRunLister, RunLister, RunScanner, ScanSummary};
pub use storage::{ArtifactStore, JsonArtifactStore, ManifestRegistry, RunRegistry};
pub use types::TestKind;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata recorded by build.rs
pub mod build_info {
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
    pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

    /// One-line description for `--debug` output
    pub fn summary() -> String {
        format!(
            "{} {} ({}, built {}{})",
            super::PKG_NAME,
            super::VERSION,
            TARGET_TRIPLE,
            BUILD_TIME,
            GIT_COMMIT.map(|c| format!(", commit {}", c)).unwrap_or_default()
        )
    }
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "https://interop.seemann.io";
    pub const DEFAULT_DATA_DIR: &str = "data";
    pub const DEFAULT_REPORT_SUBDIR: &str = "reports";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Run manifest kept in the data and report directories
    pub const MANIFEST_FILE: &str = "manifest.json";

    /// Run listing published at the root of the interop runner
    pub const LISTING_FILE: &str = "logs.json";

    /// One server task per CPU, at least one
    pub fn default_concurrency() -> usize {
        num_cpus::get().max(1)
    }
}
