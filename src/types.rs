//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Name of a QUIC implementation acting as client or server
pub type ImplementationName = String;

/// Run identifier as published by the interop runner (`YYYY-MM-DDTHH:MM`)
pub type RunId = String;

/// One numbered repetition's result, in kilobits per second
pub type SubTestResult = u64;

/// Throughput measurement families published per (server, client) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Sustained application-level throughput
    Goodput,
    /// Throughput under competing background traffic
    CrossTraffic,
}

impl TestKind {
    /// Every kind, in artifact order
    pub const ALL: [TestKind; 2] = [TestKind::Goodput, TestKind::CrossTraffic];

    /// Path segment used by the interop runner's result tree
    pub fn path_segment(&self) -> &'static str {
        match self {
            TestKind::Goodput => "goodput",
            TestKind::CrossTraffic => "crosstraffic",
        }
    }

    /// Human-readable label for reports and logs
    pub fn label(&self) -> &'static str {
        match self {
            TestKind::Goodput => "Goodput",
            TestKind::CrossTraffic => "Crosstraffic",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}
