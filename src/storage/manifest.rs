//! JSON list manifest of processed runs

use super::RunRegistry;
use crate::{
    defaults::MANIFEST_FILE,
    error::{AppError, Result},
    types::RunId,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// `manifest.json` holding a JSON array of run identifiers
#[derive(Debug, Clone)]
pub struct ManifestRegistry {
    path: PathBuf,
    runs: Vec<RunId>,
}

impl ManifestRegistry {
    /// Load the manifest in `dir`; a missing file is an empty registry
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let runs = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                AppError::persistence(format!("Failed to read manifest '{}': {}", path.display(), e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                AppError::parse(format!("Invalid manifest '{}': {}", path.display(), e))
            })?
        } else {
            Vec::new()
        };

        Ok(Self { path, runs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::persistence(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }
        let content = serde_json::to_string(&self.runs)?;
        fs::write(&self.path, content).map_err(|e| {
            AppError::persistence(format!("Failed to write manifest '{}': {}", self.path.display(), e))
        })
    }
}

impl RunRegistry for ManifestRegistry {
    fn contains(&self, run_id: &str) -> bool {
        self.runs.iter().any(|known| known == run_id)
    }

    fn append(&mut self, run_id: RunId) -> Result<()> {
        self.runs.push(run_id);
        if let Err(e) = self.write() {
            self.runs.pop();
            return Err(e);
        }
        Ok(())
    }

    fn runs(&self) -> &[RunId] {
        &self.runs
    }
}
