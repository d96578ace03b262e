//! Run discovery and sequencing
//!
//! [`RunScanner`] asks a [`RunLister`] which runs exist, skips the ones the
//! [`RunRegistry`] already holds, and for each remaining run aggregates,
//! saves and records it, in listing order.

use crate::{
    defaults::LISTING_FILE,
    error::{AppError, Result},
    executor::MatrixAggregator,
    fetch::Fetcher,
    logging::Logger,
    storage::{ArtifactStore, RunRegistry},
    types::{ImplementationName, RunId},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of the available run identifiers
#[async_trait]
pub trait RunLister: Send + Sync {
    /// Run identifiers in the order the source publishes them
    ///
    /// A [`AppError::Fetch`] means the listing could not be retrieved at all.
    async fn list_runs(&self) -> Result<Vec<RunId>>;
}

/// Reads `logs.json` (a JSON array of run identifiers) through a fetcher
pub struct FetcherRunLister {
    fetcher: Arc<dyn Fetcher>,
}

impl FetcherRunLister {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn listing_address(&self) -> String {
        self.fetcher.address_of(LISTING_FILE)
    }
}

#[async_trait]
impl RunLister for FetcherRunLister {
    async fn list_runs(&self) -> Result<Vec<RunId>> {
        let address = self.listing_address();
        let body = self.fetcher.fetch(&address).await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::parse(format!("Invalid run listing at {}: {}", address, e)))
    }
}

/// What one scan did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Runs returned by the listing
    pub listed: usize,
    /// Listed runs skipped because the registry already had them
    pub already_known: usize,
    /// Runs aggregated, saved and recorded by this scan, in order
    pub processed: Vec<RunId>,
    /// The listing could not be fetched, so nothing was looked at
    pub listing_unavailable: bool,
}

impl ScanSummary {
    /// Outcome of a scan whose listing fetch failed
    pub fn listing_unavailable() -> Self {
        Self {
            listing_unavailable: true,
            ..Self::default()
        }
    }
}

/// Sequences aggregation, persistence and registration for new runs
pub struct RunScanner<'a> {
    lister: &'a dyn RunLister,
    aggregator: &'a MatrixAggregator,
    store: &'a dyn ArtifactStore,
    registry: &'a mut dyn RunRegistry,
    logger: &'a Logger,
}

impl<'a> RunScanner<'a> {
    pub fn new(
        lister: &'a dyn RunLister,
        aggregator: &'a MatrixAggregator,
        store: &'a dyn ArtifactStore,
        registry: &'a mut dyn RunRegistry,
        logger: &'a Logger,
    ) -> Self {
        Self { lister, aggregator, store, registry, logger }
    }

    /// Process every listed run not yet in the registry
    ///
    /// An unreachable listing ends the scan with nothing done. Any other
    /// failure stops the scan; runs finished before it stay recorded and the
    /// failing run is not.
    pub async fn scan(&mut self, implementations: &[ImplementationName]) -> Result<ScanSummary> {
        let available = match self.lister.list_runs().await {
            Ok(runs) => runs,
            Err(AppError::Fetch(error)) => {
                self.logger
                    .debug("Run listing unavailable, nothing to do")
                    .fetch_error(&error)
                    .log()
                    .await;
                return Ok(ScanSummary::listing_unavailable());
            }
            Err(other) => return Err(other),
        };

        let mut summary = ScanSummary {
            listed: available.len(),
            ..ScanSummary::default()
        };

        for run_id in available {
            if self.registry.contains(&run_id) {
                summary.already_known += 1;
                continue;
            }

            let operation = self.logger.start_operation("crawl", &run_id).await;
            match self.process(&run_id, implementations).await {
                Ok(()) => {
                    self.logger.end_operation(&operation, "crawl", &run_id, true).await;
                    summary.processed.push(run_id);
                }
                Err(error) => {
                    self.logger
                        .error(&format!("Crawl for {} failed", run_id))
                        .correlation_id(&operation)
                        .error_info(&error)
                        .log()
                        .await;
                    self.logger.end_operation(&operation, "crawl", &run_id, false).await;
                    return Err(error);
                }
            }
        }

        crate::log_info!(
            self.logger,
            "Scan finished: {} listed, {} known, {} new",
            summary.listed,
            summary.already_known,
            summary.processed.len()
        );
        Ok(summary)
    }

    async fn process(&mut self, run_id: &str, implementations: &[ImplementationName]) -> Result<()> {
        crate::log_info!(self.logger, "Crawl for time {}", run_id);
        let run_base = self.aggregator.run_base(run_id);
        let artifact = self
            .aggregator
            .aggregate(&run_base, implementations, implementations)
            .await?;

        let path = self.store.save(run_id, &artifact)?;
        self.registry.append(run_id.to_string())?;

        self.logger
            .info(&format!("Stored {}", run_id))
            .field("path", path.display().to_string())
            .field("results", artifact.result_count())
            .log()
            .await;
        Ok(())
    }
}
