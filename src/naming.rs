//! Run identifier to artifact file name mapping
//!
//! The crawler and the report generator both address stored runs through
//! [`artifact_file_name`], so a run written by one is found by the other.

use crate::error::{AppError, Result};
use chrono::NaiveDateTime;

/// Format of run identifiers published by the interop runner
pub const RUN_ID_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Stem of the stored artifact name (colon dropped)
pub const ARTIFACT_STEM_FORMAT: &str = "%Y-%m-%dT%H%M";

/// Parse a run identifier such as `2024-10-22T16:35`
pub fn parse_run_id(run_id: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(run_id, RUN_ID_FORMAT)
        .map_err(|e| AppError::parse(format!("Invalid run identifier '{}': {}", run_id, e)))
}

/// Artifact name for `run_id` with extension `ext`: `2024-10-22T1635.json`
pub fn artifact_file_name(run_id: &str, ext: &str) -> Result<String> {
    let timestamp = parse_run_id(run_id)?;
    Ok(format!("{}.{}", timestamp.format(ARTIFACT_STEM_FORMAT), ext))
}
