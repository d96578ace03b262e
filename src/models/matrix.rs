//! Server x client result matrices and the per-run artifact

use crate::error::{AppError, Result};
use crate::types::{ImplementationName, SubTestResult, TestKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered results of every successful sub-test for one (server, client, kind)
pub type PairResult = Vec<SubTestResult>;

/// One server's results keyed by client
pub type MatrixRow = BTreeMap<ImplementationName, PairResult>;

/// Complete server x client grid for one test kind
///
/// Rows are only added through [`Matrix::insert_row`], which refuses a second
/// row for the same server. Aggregation gives each server to exactly one task,
/// so rows never collide and the merge needs no lock or conflict policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    rows: BTreeMap<ImplementationName, MatrixRow>,
}

impl Matrix {
    /// Create an empty matrix
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the full row for `server`
    pub fn insert_row(&mut self, server: ImplementationName, row: MatrixRow) -> Result<()> {
        if self.rows.contains_key(&server) {
            return Err(AppError::aggregation(format!(
                "row for server '{}' was produced twice",
                server
            )));
        }
        self.rows.insert(server, row);
        Ok(())
    }

    /// Results for one (server, client) pair
    pub fn get(&self, server: &str, client: &str) -> Option<&PairResult> {
        self.rows.get(server).and_then(|row| row.get(client))
    }

    /// Row for one server
    pub fn row(&self, server: &str) -> Option<&MatrixRow> {
        self.rows.get(server)
    }

    /// Iterate rows in server order
    pub fn rows(&self) -> impl Iterator<Item = (&ImplementationName, &MatrixRow)> {
        self.rows.iter()
    }

    /// Server names in sorted order
    pub fn servers(&self) -> Vec<&str> {
        self.rows.keys().map(String::as_str).collect()
    }

    /// Every implementation name appearing as server or client, sorted
    pub fn implementations(&self) -> Vec<ImplementationName> {
        let mut names: Vec<ImplementationName> = self
            .rows
            .iter()
            .flat_map(|(server, row)| std::iter::once(server).chain(row.keys()))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Number of (server, client) entries present
    pub fn pair_count(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    /// Number of entries holding at least one result
    pub fn populated_pair_count(&self) -> usize {
        self.rows
            .values()
            .flat_map(|row| row.values())
            .filter(|results| !results.is_empty())
            .count()
    }

    /// Check that every (server, client) pair has an entry
    pub fn is_complete(&self, servers: &[ImplementationName], clients: &[ImplementationName]) -> bool {
        servers.iter().all(|server| {
            self.rows
                .get(server)
                .map(|row| clients.iter().all(|client| row.contains_key(client)))
                .unwrap_or(false)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Both matrices collected for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArtifact {
    pub goodput: Matrix,
    pub crosstraffic: Matrix,
}

impl RunArtifact {
    /// Matrix for the given kind
    pub fn matrix(&self, kind: TestKind) -> &Matrix {
        match kind {
            TestKind::Goodput => &self.goodput,
            TestKind::CrossTraffic => &self.crosstraffic,
        }
    }

    /// Mutable matrix for the given kind
    pub fn matrix_mut(&mut self, kind: TestKind) -> &mut Matrix {
        match kind {
            TestKind::Goodput => &mut self.goodput,
            TestKind::CrossTraffic => &mut self.crosstraffic,
        }
    }

    /// Total number of sub-test results across both matrices
    pub fn result_count(&self) -> usize {
        TestKind::ALL
            .iter()
            .map(|kind| {
                self.matrix(*kind)
                    .rows()
                    .flat_map(|(_, row)| row.values())
                    .map(|results| results.len())
                    .sum::<usize>()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, &[u64])]) -> MatrixRow {
        entries
            .iter()
            .map(|(client, results)| (client.to_string(), results.to_vec()))
            .collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut matrix = Matrix::new();
        matrix
            .insert_row("quiche".to_string(), row(&[("quiche", &[100, 200]), ("lsquic", &[])]))
            .unwrap();

        assert_eq!(matrix.get("quiche", "quiche"), Some(&vec![100, 200]));
        assert_eq!(matrix.get("quiche", "lsquic"), Some(&vec![]));
        assert_eq!(matrix.get("lsquic", "quiche"), None);
        assert_eq!(matrix.pair_count(), 2);
        assert_eq!(matrix.populated_pair_count(), 1);
    }

    #[test]
    fn test_duplicate_row_rejected() {
        let mut matrix = Matrix::new();
        matrix.insert_row("a".to_string(), MatrixRow::new()).unwrap();
        let error = matrix.insert_row("a".to_string(), MatrixRow::new()).unwrap_err();
        assert!(matches!(error, AppError::Aggregation(_)));
    }

    #[test]
    fn test_completeness() {
        let names = vec!["a".to_string(), "b".to_string()];
        let mut matrix = Matrix::new();
        matrix.insert_row("a".to_string(), row(&[("a", &[1]), ("b", &[])])).unwrap();
        assert!(!matrix.is_complete(&names, &names));

        matrix.insert_row("b".to_string(), row(&[("a", &[]), ("b", &[2, 3])])).unwrap();
        assert!(matrix.is_complete(&names, &names));
        assert_eq!(matrix.implementations(), names);
    }

    #[test]
    fn test_artifact_serializes_with_kind_keys() {
        let mut artifact = RunArtifact::default();
        artifact
            .matrix_mut(TestKind::Goodput)
            .insert_row("a".to_string(), row(&[("b", &[1234])]))
            .unwrap();

        let json: serde_json::Value = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["goodput"]["a"]["b"], serde_json::json!([1234]));
        assert_eq!(json["crosstraffic"], serde_json::json!({}));
        assert_eq!(artifact.result_count(), 1);
    }

    #[test]
    fn test_artifact_reads_crawler_output() {
        let text = r#"{"goodput": {"s": {"c": [10, 20]}}, "crosstraffic": {"s": {"c": []}}}"#;
        let artifact: RunArtifact = serde_json::from_str(text).unwrap();
        assert_eq!(artifact.goodput.get("s", "c"), Some(&vec![10, 20]));
        assert_eq!(artifact.crosstraffic.get("s", "c"), Some(&vec![]));
    }
}
