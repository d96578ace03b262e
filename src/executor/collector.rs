//! One server's row of both matrices

use super::probe::{ProbeMode, SubTestProbe};
use crate::{
    error::Result,
    fetch::Fetcher,
    logging::Logger,
    models::MatrixRow,
    types::{ImplementationName, TestKind},
};

/// Both rows produced for a single server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerRows {
    pub server: ImplementationName,
    pub goodput: MatrixRow,
    pub crosstraffic: MatrixRow,
}

impl ServerRows {
    fn row_mut(&mut self, kind: TestKind) -> &mut MatrixRow {
        match kind {
            TestKind::Goodput => &mut self.goodput,
            TestKind::CrossTraffic => &mut self.crosstraffic,
        }
    }
}

/// Probes every client against one server, sequentially
pub struct PairCollector<'a> {
    probe: SubTestProbe<'a>,
    logger: &'a Logger,
}

impl<'a> PairCollector<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, logger: &'a Logger, mode: ProbeMode) -> Self {
        Self {
            probe: SubTestProbe::new(fetcher, logger, mode),
            logger,
        }
    }

    /// Probe both kinds for every `(server, client)` pair
    ///
    /// Every client gets an entry in both rows, empty when nothing was found.
    pub async fn collect(
        &self,
        run_base: &str,
        server: &str,
        clients: &[ImplementationName],
    ) -> Result<ServerRows> {
        let mut rows = ServerRows {
            server: server.to_string(),
            ..ServerRows::default()
        };

        for client in clients {
            crate::log_debug!(self.logger, "Client: {}, Server: {}", client, server);
            for kind in TestKind::ALL {
                let results = self.probe.probe(run_base, server, client, kind).await?;
                rows.row_mut(kind).insert(client.clone(), results);
            }
        }

        self.logger
            .info(&format!("Collected row for server {}", server))
            .field("clients", clients.len())
            .field(
                "goodput_pairs",
                rows.goodput.values().filter(|r| !r.is_empty()).count(),
            )
            .field(
                "crosstraffic_pairs",
                rows.crosstraffic.values().filter(|r| !r.is_empty()).count(),
            )
            .log()
            .await;

        Ok(rows)
    }
}
