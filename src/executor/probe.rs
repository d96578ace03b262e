//! Sequential probing of numbered sub-tests for one (server, client, kind)

use crate::{
    error::{AppError, ExtractError, FetchError, Result},
    extract::extract_result,
    fetch::Fetcher,
    logging::Logger,
    models::PairResult,
    types::TestKind,
};

/// How a probe reacts to failures other than "no such sub-test"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    /// Any fetch or extraction failure ends the pair's sequence
    #[default]
    Lenient,
    /// Only a missing sub-test ends the sequence; transport failures and
    /// malformed output abort the run
    Strict,
}

/// What a single sub-test index yielded
enum Step {
    Value(u64),
    Stop,
}

/// Walks sub-test indices 1, 2, 3, ... until one is missing or unusable
pub struct SubTestProbe<'a> {
    fetcher: &'a dyn Fetcher,
    logger: &'a Logger,
    mode: ProbeMode,
}

impl<'a> SubTestProbe<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, logger: &'a Logger, mode: ProbeMode) -> Self {
        Self { fetcher, logger, mode }
    }

    /// Address of one sub-test's output below `run_base`
    pub fn sub_test_address(run_base: &str, server: &str, client: &str, kind: TestKind, index: u64) -> String {
        format!(
            "{}/{}_{}/{}/{}/output.txt",
            run_base.trim_end_matches('/'),
            server,
            client,
            kind.path_segment(),
            index
        )
    }

    /// Collect every consecutive result for the triple, starting at index 1
    ///
    /// An empty or short sequence is a normal outcome. There is no upper bound
    /// on the index; the sequence ends when the source stops having data.
    pub async fn probe(&self, run_base: &str, server: &str, client: &str, kind: TestKind) -> Result<PairResult> {
        let mut results = PairResult::new();

        for index in 1u64.. {
            let address = Self::sub_test_address(run_base, server, client, kind, index);
            match self.step(&address).await? {
                Step::Value(value) => {
                    crate::log_debug!(
                        self.logger,
                        "{} {}->{} idx {}: {} kbps",
                        kind.label(),
                        client,
                        server,
                        index,
                        value
                    );
                    results.push(value);
                }
                Step::Stop => {
                    self.logger
                        .debug(&format!("{} test stopped at idx {}", kind.label(), index))
                        .field("server", server)
                        .field("client", client)
                        .field("collected", results.len())
                        .log()
                        .await;
                    break;
                }
            }
        }

        Ok(results)
    }

    async fn step(&self, address: &str) -> Result<Step> {
        let text = match self.fetcher.fetch(address).await {
            Ok(text) => text,
            Err(error) => return self.on_fetch_error(error).await,
        };

        match extract_result(&text) {
            Ok(value) => Ok(Step::Value(value)),
            Err(ExtractError::ResultNotFound) => match self.mode {
                ProbeMode::Lenient => Ok(Step::Stop),
                ProbeMode::Strict => Err(AppError::aggregation(format!(
                    "malformed result in {}",
                    address
                ))),
            },
        }
    }

    async fn on_fetch_error(&self, error: FetchError) -> Result<Step> {
        match (&error, self.mode) {
            (FetchError::NotFound { .. }, _) => Ok(Step::Stop),
            (FetchError::Transport { .. }, ProbeMode::Lenient) => {
                self.logger.debug("sub-test fetch failed").fetch_error(&error).log().await;
                Ok(Step::Stop)
            }
            (FetchError::Transport { .. }, ProbeMode::Strict) | (FetchError::Unreachable { .. }, _) => {
                self.logger.warn("sub-test source failed").fetch_error(&error).log().await;
                Err(AppError::Fetch(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::test_support::ScriptedFetcher;

    const BASE: &str = "http://interop/2024-10-22T16:35";

    fn address(index: u64) -> String {
        SubTestProbe::sub_test_address(BASE, "quiche", "lsquic", TestKind::Goodput, index)
    }

    #[test]
    fn test_address_layout() {
        assert_eq!(
            SubTestProbe::sub_test_address("http://h/run/", "s", "c", TestKind::CrossTraffic, 3),
            "http://h/run/s_c/crosstraffic/3/output.txt"
        );
    }

    #[tokio::test]
    async fn test_stops_after_first_missing_index() {
        let fetcher = ScriptedFetcher::new()
            .with_text(&address(1), "Goodput: 100 kbps")
            .with_text(&address(2), "noise\nGoodput: 200 kbps")
            .with_text(&address(3), "Goodput: 300 kbps")
            .with_text(&address(5), "Goodput: 500 kbps");
        let logger = Logger::quiet("TEST");
        let probe = SubTestProbe::new(&fetcher, &logger, ProbeMode::Lenient);

        let results = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap();

        assert_eq!(results, vec![100, 200, 300]);
        assert_eq!(fetcher.requested(), vec![address(1), address(2), address(3), address(4)]);
    }

    #[tokio::test]
    async fn test_missing_first_index_is_empty() {
        let fetcher = ScriptedFetcher::new();
        let logger = Logger::quiet("TEST");
        let probe = SubTestProbe::new(&fetcher, &logger, ProbeMode::Lenient);

        let results = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(fetcher.requested(), vec![address(1)]);
    }

    #[tokio::test]
    async fn test_malformed_output_truncates_in_lenient_mode() {
        let fetcher = ScriptedFetcher::new()
            .with_text(&address(1), "Goodput: 100 kbps")
            .with_text(&address(2), "crashed")
            .with_text(&address(3), "Goodput: 300 kbps");
        let logger = Logger::quiet("TEST");
        let probe = SubTestProbe::new(&fetcher, &logger, ProbeMode::Lenient);

        let results = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap();
        assert_eq!(results, vec![100]);
    }

    #[tokio::test]
    async fn test_transport_error_stops_in_lenient_mode() {
        let fetcher = ScriptedFetcher::new()
            .with_text(&address(1), "Goodput: 100 kbps")
            .with_error(&address(2), FetchError::transport(address(2), "HTTP 500"));
        let logger = Logger::quiet("TEST");
        let probe = SubTestProbe::new(&fetcher, &logger, ProbeMode::Lenient);

        let results = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap();
        assert_eq!(results, vec![100]);
    }

    #[tokio::test]
    async fn test_malformed_output_aborts_in_strict_mode() {
        let fetcher = ScriptedFetcher::new()
            .with_text(&address(1), "Goodput: 100 kbps")
            .with_text(&address(2), "crashed");
        let logger = Logger::quiet("TEST");
        let probe = SubTestProbe::new(&fetcher, &logger, ProbeMode::Strict);

        let error = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap_err();
        assert!(matches!(error, AppError::Aggregation(_)));
    }

    #[tokio::test]
    async fn test_strict_mode_still_stops_on_not_found() {
        let fetcher = ScriptedFetcher::new().with_text(&address(1), "Goodput: 7 kbps");
        let logger = Logger::quiet("TEST");
        let probe = SubTestProbe::new(&fetcher, &logger, ProbeMode::Strict);

        let results = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap();
        assert_eq!(results, vec![7]);
    }

    #[tokio::test]
    async fn test_unreachable_source_aborts_in_any_mode() {
        for mode in [ProbeMode::Lenient, ProbeMode::Strict] {
            let fetcher = ScriptedFetcher::new()
                .with_error(&address(1), FetchError::unreachable(address(1), "connection refused"));
            let logger = Logger::quiet("TEST");
            let probe = SubTestProbe::new(&fetcher, &logger, mode);

            let error = probe.probe(BASE, "quiche", "lsquic", TestKind::Goodput).await.unwrap_err();
            assert!(matches!(error, AppError::Fetch(FetchError::Unreachable { .. })));
        }
    }
}
