//! Fetch-probe-aggregate engine
//!
//! - [`SubTestProbe`] walks the numbered sub-tests of one (server, client, kind)
//! - [`PairCollector`] builds one server's rows across all clients
//! - [`MatrixAggregator`] runs one collector per server concurrently and
//!   merges their rows into a [`RunArtifact`]

pub mod collector;
pub mod probe;

#[cfg(test)]
pub(crate) mod test_support;

pub use collector::{PairCollector, ServerRows};
pub use probe::{ProbeMode, SubTestProbe};

use crate::{
    error::{AppError, Result},
    fetch::Fetcher,
    logging::Logger,
    models::{Config, RunArtifact},
    types::{ImplementationName, TestKind},
};
use std::sync::Arc;
use tokio::{sync::Semaphore, task::JoinSet};

/// Settings for one aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Upper bound on server rows collected simultaneously
    pub concurrency: usize,
    /// Probe stop policy
    pub mode: ProbeMode,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            concurrency: crate::defaults::default_concurrency(),
            mode: ProbeMode::Lenient,
        }
    }
}

impl From<&Config> for AggregationConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            mode: config.probe_mode(),
        }
    }
}

/// Fans one collector per server out over tokio tasks and joins the rows
pub struct MatrixAggregator {
    fetcher: Arc<dyn Fetcher>,
    logger: Arc<Logger>,
    config: AggregationConfig,
}

impl MatrixAggregator {
    pub fn new(fetcher: Arc<dyn Fetcher>, logger: Arc<Logger>, config: AggregationConfig) -> Self {
        Self { fetcher, logger, config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Address of a run's result tree
    pub fn run_base(&self, run_id: &str) -> String {
        self.fetcher.address_of(run_id)
    }

    /// Collect both matrices for every `servers x clients` pair of one run
    ///
    /// Any task failure fails the whole run and aborts the tasks still
    /// running; a partial artifact is never returned. Dropping the returned
    /// future cancels all tasks as well.
    pub async fn aggregate(
        &self,
        run_base: &str,
        servers: &[ImplementationName],
        clients: &[ImplementationName],
    ) -> Result<RunArtifact> {
        let limiter = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let clients: Arc<[ImplementationName]> = Arc::from(clients);
        let run_base: Arc<str> = Arc::from(run_base);
        let mode = self.config.mode;

        let mut tasks = JoinSet::new();
        for server in servers {
            let server = server.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let logger = Arc::clone(&self.logger);
            let limiter = Arc::clone(&limiter);
            let clients = Arc::clone(&clients);
            let run_base = Arc::clone(&run_base);

            tasks.spawn(async move {
                let _permit = limiter
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::internal(format!("concurrency limiter closed: {}", e)))?;
                let collector = PairCollector::new(fetcher.as_ref(), logger.as_ref(), mode);
                collector.collect(&run_base, &server, &clients).await
            });
        }

        // Each server was handed to exactly one task, so rows land on
        // disjoint keys and the merge below needs no conflict handling.
        let mut artifact = RunArtifact::default();
        while let Some(joined) = tasks.join_next().await {
            let rows = joined
                .map_err(|e| AppError::aggregation(format!("server task did not finish: {}", e)))??;
            artifact
                .matrix_mut(TestKind::Goodput)
                .insert_row(rows.server.clone(), rows.goodput)?;
            artifact
                .matrix_mut(TestKind::CrossTraffic)
                .insert_row(rows.server, rows.crosstraffic)?;
        }

        for kind in TestKind::ALL {
            if !artifact.matrix(kind).is_complete(servers, &clients) {
                return Err(AppError::aggregation(format!(
                    "{} matrix for {} is missing pairs",
                    kind.label(),
                    run_base
                )));
            }
        }

        crate::log_info!(
            self.logger,
            "Aggregated {} servers x {} clients for {} ({} results)",
            servers.len(),
            clients.len(),
            run_base,
            artifact.result_count()
        );

        Ok(artifact)
    }
}
