//! Data models and structures for the interop crawler

pub mod config;
pub mod matrix;

// Re-export main model types
pub use config::Config;
pub use matrix::{Matrix, MatrixRow, PairResult, RunArtifact};
