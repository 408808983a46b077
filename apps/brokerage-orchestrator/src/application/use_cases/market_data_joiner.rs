//! Market Data Joiner
//!
//! One batched snapshot call per symbol set, returned as a symbol-keyed map.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::error::OrchestrationError;
use crate::application::ports::BrokerGatewayPort;
use crate::application::routes;
use crate::application::use_cases::support::{dispatch, expect_success};
use crate::domain::market_data::{TickerMap, decode_snapshot_batch};
use crate::domain::shared::Symbol;

/// Fetches ticker snapshots for a set of symbols.
pub struct MarketDataJoiner<G>
where
    G: BrokerGatewayPort,
{
    gateway: Arc<G>,
}

impl<G> MarketDataJoiner<G>
where
    G: BrokerGatewayPort,
{
    /// Create a new MarketDataJoiner.
    pub const fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Snapshots for `symbols`, keyed by symbol.
    ///
    /// An empty input makes no upstream call. Symbols the upstream does not
    /// return are absent from the map.
    ///
    /// # Errors
    ///
    /// Transport failures, `UpstreamRejected`, `MalformedUpstreamResponse`,
    /// and `Cancelled`. Callers treat these as a degraded enrichment.
    pub async fn snapshot(
        &self,
        symbols: &[Symbol],
        cancel: &CancellationToken,
    ) -> Result<TickerMap, OrchestrationError> {
        let unique = dedupe(symbols);
        if unique.is_empty() {
            return Ok(TickerMap::new());
        }

        let joined = unique
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let request = routes::snapshots().get().with_query("symbols", joined);

        let response = expect_success(dispatch(self.gateway.as_ref(), request, cancel).await?)?;
        let tickers = decode_snapshot_batch(&response.body).map_err(|e| {
            OrchestrationError::MalformedUpstreamResponse {
                message: e.to_string(),
            }
        })?;

        tracing::debug!(
            requested = unique.len(),
            returned = tickers.len(),
            "Fetched ticker snapshots"
        );
        Ok(tickers)
    }
}

/// Drop repeats, keeping first occurrence order. Blank symbols are skipped.
fn dedupe(symbols: &[Symbol]) -> Vec<&Symbol> {
    let mut seen = HashSet::new();
    symbols
        .iter()
        .filter(|s| !s.as_str().is_empty())
        .filter(|s| seen.insert(*s))
        .collect()
}
