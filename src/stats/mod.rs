//! Per-pair statistics over a run's matrices
//!
//! Every cell of a report grid is the mean and population standard
//! deviation of one pair's sub-test results, the same quantities the
//! heatmaps of the interop dashboards show.

use crate::{
    models::Matrix,
    types::{ImplementationName, SubTestResult},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one pair's result sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellStatistics {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divides by `count`)
    pub std_dev: f64,
    pub min: SubTestResult,
    pub max: SubTestResult,
}

impl CellStatistics {
    /// Statistics of `samples`, or `None` for an empty sequence
    pub fn from_samples(samples: &[SubTestResult]) -> Option<Self> {
        let count = samples.len();
        if count == 0 {
            return None;
        }

        let mut sum = 0.0;
        let mut min = SubTestResult::MAX;
        let mut max = SubTestResult::MIN;
        for &sample in samples {
            sum += sample as f64;
            min = min.min(sample);
            max = max.max(sample);
        }

        let mean = sum / count as f64;
        let variance = samples
            .iter()
            .map(|&x| {
                let diff = x as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / count as f64;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Statistics for every populated cell of one matrix, keyed `(client, server)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixStatistics {
    implementations: Vec<ImplementationName>,
    cells: BTreeMap<(ImplementationName, ImplementationName), CellStatistics>,
}

impl MatrixStatistics {
    pub fn from_matrix(matrix: &Matrix) -> Self {
        let mut cells = BTreeMap::new();
        for (server, row) in matrix.rows() {
            for (client, results) in row {
                if let Some(stats) = CellStatistics::from_samples(results) {
                    cells.insert((client.clone(), server.clone()), stats);
                }
            }
        }

        Self {
            implementations: matrix.implementations(),
            cells,
        }
    }

    /// Sorted names spanning both axes of the grid
    pub fn implementations(&self) -> &[ImplementationName] {
        &self.implementations
    }

    pub fn cell(&self, client: &str, server: &str) -> Option<&CellStatistics> {
        self.cells.get(&(client.to_string(), server.to_string()))
    }

    /// Number of cells with at least one result
    pub fn populated(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells in the full grid
    pub fn capacity(&self) -> usize {
        self.implementations.len() * self.implementations.len()
    }

    /// Pair with the highest mean as `(client, server, stats)`
    pub fn best_pair(&self) -> Option<(&str, &str, &CellStatistics)> {
        self.cells
            .iter()
            .max_by(|a, b| a.1.mean.total_cmp(&b.1.mean))
            .map(|((client, server), stats)| (client.as_str(), server.as_str(), stats))
    }

    /// Pair with the lowest populated mean as `(client, server, stats)`
    pub fn worst_pair(&self) -> Option<(&str, &str, &CellStatistics)> {
        self.cells
            .iter()
            .min_by(|a, b| a.1.mean.total_cmp(&b.1.mean))
            .map(|((client, server), stats)| (client.as_str(), server.as_str(), stats))
    }

    /// Largest mean over all cells, used to scale color bands
    pub fn max_mean(&self) -> f64 {
        self.cells.values().map(|s| s.mean).fold(0.0, f64::max)
    }
}
