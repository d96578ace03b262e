//! On-disk state of the crawler
//!
//! [`RunRegistry`] tracks which runs are done; [`ArtifactStore`] holds each
//! run's matrices. A run is appended to the registry only after its artifact
//! has been saved, so a crash in between leaves the run unprocessed.

pub mod artifact;
pub mod manifest;

pub use artifact::JsonArtifactStore;
pub use manifest::ManifestRegistry;

use crate::{error::Result, models::RunArtifact, types::RunId};
use std::path::PathBuf;

/// Ordered, append-only record of processed runs
pub trait RunRegistry: Send {
    /// Whether `run_id` was already processed
    fn contains(&self, run_id: &str) -> bool;

    /// Record `run_id` as processed and persist the record
    fn append(&mut self, run_id: RunId) -> Result<()>;

    /// Processed runs in append order
    fn runs(&self) -> &[RunId];
}

/// Storage of one artifact per run
pub trait ArtifactStore: Send + Sync {
    /// Write the whole artifact for `run_id` and return where it went
    fn save(&self, run_id: &str, artifact: &RunArtifact) -> Result<PathBuf>;

    /// Read back a previously saved artifact
    fn load(&self, run_id: &str) -> Result<RunArtifact>;
}
