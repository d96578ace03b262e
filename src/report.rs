//! Summary tables for stored runs
//!
//! Every run in the data manifest that the report manifest does not list yet
//! gets one text grid per test kind, written under
//! `<report_dir>/<kind>/<run>.txt`.

use crate::{
    error::{AppError, Result},
    logging::Logger,
    naming::artifact_file_name,
    output::{OutputFormatter, OutputFormatterFactory, PlainFormatter},
    stats::MatrixStatistics,
    storage::{ArtifactStore, RunRegistry},
    types::{RunId, TestKind},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// What one report pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Stored runs without a report before this pass
    pub pending: usize,
    /// Runs reported by this pass, in manifest order
    pub reported: Vec<RunId>,
    /// Runs whose artifact could not be found
    pub missing: Vec<RunId>,
}

/// Renders grids for stored runs and records them as reported
pub struct ReportGenerator<'a> {
    store: &'a dyn ArtifactStore,
    report_dir: PathBuf,
    file_formatter: PlainFormatter,
    console: Option<&'a dyn OutputFormatter>,
    logger: &'a Logger,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(store: &'a dyn ArtifactStore, report_dir: impl Into<PathBuf>, logger: &'a Logger) -> Self {
        Self {
            store,
            report_dir: report_dir.into(),
            file_formatter: OutputFormatterFactory::create_plain_formatter(),
            console: None,
            logger,
        }
    }

    /// Also print each grid through `formatter`
    pub fn with_console(mut self, formatter: &'a dyn OutputFormatter) -> Self {
        self.console = Some(formatter);
        self
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Location of the grid for one run and kind
    pub fn report_path(&self, run_id: &str, kind: TestKind) -> Result<PathBuf> {
        Ok(self
            .report_dir
            .join(kind.path_segment())
            .join(artifact_file_name(run_id, "txt")?))
    }

    /// Report every run of `stored` that `reported` does not contain
    pub async fn generate(
        &self,
        stored: &dyn RunRegistry,
        reported: &mut dyn RunRegistry,
    ) -> Result<ReportSummary> {
        let pending: Vec<RunId> = stored
            .runs()
            .iter()
            .filter(|run_id| !reported.contains(run_id))
            .cloned()
            .collect();

        let mut summary = ReportSummary {
            pending: pending.len(),
            ..ReportSummary::default()
        };

        for run_id in pending {
            crate::log_info!(self.logger, "Draw for {}", run_id);

            let artifact = match self.store.load(&run_id) {
                Ok(artifact) => artifact,
                Err(AppError::Io(message)) => {
                    self.logger
                        .error(&format!("Artifact for {} does not exist", run_id))
                        .field("detail", message)
                        .log()
                        .await;
                    summary.missing.push(run_id);
                    continue;
                }
                Err(other) => return Err(other),
            };

            for kind in TestKind::ALL {
                let stats = MatrixStatistics::from_matrix(artifact.matrix(kind));
                let path = self.write_grid(&run_id, kind, &stats)?;
                crate::log_debug!(self.logger, "Wrote {}", path.display());

                if let Some(console) = self.console {
                    println!("{}", console.format_grid(&run_id, kind, &stats)?);
                }
            }

            reported.append(run_id.clone())?;
            summary.reported.push(run_id);
        }

        Ok(summary)
    }

    fn write_grid(&self, run_id: &str, kind: TestKind, stats: &MatrixStatistics) -> Result<PathBuf> {
        let path = self.report_path(run_id, kind)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::report(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }

        let text = self.file_formatter.format_grid(run_id, kind, stats)?;
        fs::write(&path, text)
            .map_err(|e| AppError::report(format!("Failed to write '{}': {}", path.display(), e)))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{MatrixRow, RunArtifact},
        storage::{JsonArtifactStore, ManifestRegistry},
    };
    use tempfile::TempDir;

    fn artifact() -> RunArtifact {
        let mut artifact = RunArtifact::default();
        for kind in TestKind::ALL {
            let mut row = MatrixRow::new();
            row.insert("lsquic".to_string(), vec![1000, 3000]);
            row.insert("quiche".to_string(), vec![]);
            artifact.matrix_mut(kind).insert_row("quiche".to_string(), row).unwrap();
        }
        artifact
    }

    struct Fixture {
        _dir: TempDir,
        data_dir: PathBuf,
        report_dir: PathBuf,
        store: JsonArtifactStore,
    }

    fn fixture(runs: &[&str], with_artifact: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let report_dir = dir.path().join("reports");
        let store = JsonArtifactStore::new(&data_dir);

        let mut manifest = ManifestRegistry::load(&data_dir).unwrap();
        for run in runs {
            if with_artifact.contains(run) {
                store.save(run, &artifact()).unwrap();
            }
            manifest.append(run.to_string()).unwrap();
        }

        Fixture { _dir: dir, data_dir, report_dir, store }
    }

    #[tokio::test]
    async fn test_reports_only_unreported_runs() {
        let f = fixture(&["2024-10-22T16:35", "2024-10-22T18:00"], &["2024-10-22T16:35", "2024-10-22T18:00"]);
        let logger = Logger::quiet("TEST");
        let stored = ManifestRegistry::load(&f.data_dir).unwrap();
        let mut reported = ManifestRegistry::load(&f.report_dir).unwrap();
        reported.append("2024-10-22T16:35".to_string()).unwrap();

        let generator = ReportGenerator::new(&f.store, &f.report_dir, &logger);
        let summary = generator.generate(&stored, &mut reported).await.unwrap();

        assert_eq!(summary.pending, 1);
        assert_eq!(summary.reported, vec!["2024-10-22T18:00".to_string()]);
        assert!(!f.report_dir.join("goodput").join("2024-10-22T1635.txt").exists());

        let text = fs::read_to_string(f.report_dir.join("goodput").join("2024-10-22T1800.txt")).unwrap();
        assert!(text.contains("2024-10-22T18:00 Goodput"));
        assert!(text.contains("2000 ± 1000"));
        assert!(f.report_dir.join("crosstraffic").join("2024-10-22T1800.txt").exists());

        let reloaded = ManifestRegistry::load(&f.report_dir).unwrap();
        assert_eq!(reloaded.runs(), ["2024-10-22T16:35".to_string(), "2024-10-22T18:00".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_artifact_stays_unreported() {
        let f = fixture(&["2024-10-22T16:35", "2024-10-22T18:00"], &["2024-10-22T18:00"]);
        let logger = Logger::quiet("TEST");
        let stored = ManifestRegistry::load(&f.data_dir).unwrap();
        let mut reported = ManifestRegistry::load(&f.report_dir).unwrap();

        let summary = ReportGenerator::new(&f.store, &f.report_dir, &logger)
            .generate(&stored, &mut reported)
            .await
            .unwrap();

        assert_eq!(summary.missing, vec!["2024-10-22T16:35".to_string()]);
        assert_eq!(summary.reported, vec!["2024-10-22T18:00".to_string()]);
        assert!(!reported.contains("2024-10-22T16:35"));
    }

    #[tokio::test]
    async fn test_nothing_pending() {
        let f = fixture(&[], &[]);
        let logger = Logger::quiet("TEST");
        let stored = ManifestRegistry::load(&f.data_dir).unwrap();
        let mut reported = ManifestRegistry::load(&f.report_dir).unwrap();

        let summary = ReportGenerator::new(&f.store, &f.report_dir, &logger)
            .generate(&stored, &mut reported)
            .await
            .unwrap();
        assert_eq!(summary, ReportSummary::default());
        assert!(!f.report_dir.exists());
    }

    #[test]
    fn test_report_path_layout() {
        let logger = Logger::quiet("TEST");
        let store = JsonArtifactStore::new("data");
        let generator = ReportGenerator::new(&store, "reports", &logger);
        assert_eq!(
            generator.report_path("2024-10-22T16:35", TestKind::CrossTraffic).unwrap(),
            PathBuf::from("reports/crosstraffic/2024-10-22T1635.txt")
        );
    }
}
