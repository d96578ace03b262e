//! One JSON document per run

use super::ArtifactStore;
use crate::{
    error::{AppError, Result},
    models::RunArtifact,
    naming::artifact_file_name,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Writes `{"goodput": ..., "crosstraffic": ...}` to `<dir>/<run>.json`
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the artifact for `run_id`
    pub fn path_for(&self, run_id: &str) -> Result<PathBuf> {
        Ok(self.dir.join(artifact_file_name(run_id, "json")?))
    }
}

impl ArtifactStore for JsonArtifactStore {
    fn save(&self, run_id: &str, artifact: &RunArtifact) -> Result<PathBuf> {
        let path = self.path_for(run_id)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::persistence(format!("Failed to create '{}': {}", self.dir.display(), e))
        })?;

        let content = serde_json::to_string(artifact)?;
        fs::write(&path, content).map_err(|e| {
            AppError::persistence(format!("Failed to write artifact '{}': {}", path.display(), e))
        })?;
        Ok(path)
    }

    fn load(&self, run_id: &str) -> Result<RunArtifact> {
        let path = self.path_for(run_id)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::io(format!("Failed to read artifact '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::parse(format!("Invalid artifact '{}': {}", path.display(), e)))
    }
}
