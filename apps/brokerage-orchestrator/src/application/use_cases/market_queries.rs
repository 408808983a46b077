//! Market Queries Use Case
//!
//! Single-symbol market-data reads: snapshot, historical series and
//! latest prints.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::dto::{HistoricalQuery, UpstreamReply};
use crate::application::error::OrchestrationError;
use crate::application::ports::BrokerGatewayPort;
use crate::application::routes::{self, Series};
use crate::application::use_cases::market_data_joiner::MarketDataJoiner;
use crate::application::use_cases::support::{decode, dispatch, parse_symbol, pass_through};
use crate::domain::market_data::{TickerMap, TickerSnapshot};
use crate::domain::shared::Symbol;

/// Market-data reads that need no account.
pub struct MarketQueries<G>
where
    G: BrokerGatewayPort,
{
    gateway: Arc<G>,
    joiner: MarketDataJoiner<G>,
}

impl<G> MarketQueries<G>
where
    G: BrokerGatewayPort,
{
    /// Create a new MarketQueries.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            joiner: MarketDataJoiner::new(Arc::clone(&gateway)),
            gateway,
        }
    }

    /// Snapshots for a comma-separated symbol list.
    pub async fn tickers(
        &self,
        symbols: &str,
        cancel: &CancellationToken,
    ) -> Result<TickerMap, OrchestrationError> {
        let symbols = symbols
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(parse_symbol)
            .collect::<Result<Vec<Symbol>, _>>()?;
        self.joiner.snapshot(&symbols, cancel).await
    }

    /// Snapshot for one symbol, with today's change derived.
    pub async fn snapshot(
        &self,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<TickerSnapshot, OrchestrationError> {
        let symbol = parse_symbol(symbol)?;
        let request = routes::snapshot(&symbol).get();
        let snapshot: TickerSnapshot =
            decode(dispatch(self.gateway.as_ref(), request, cancel).await?)?;
        Ok(snapshot.with_derived_change())
    }

    /// Historical trades.
    pub async fn trades(
        &self,
        symbol: &str,
        query: &HistoricalQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        self.series(symbol, Series::Trades, query, cancel).await
    }

    /// Historical quotes.
    pub async fn quotes(
        &self,
        symbol: &str,
        query: &HistoricalQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        self.series(symbol, Series::Quotes, query, cancel).await
    }

    /// Historical bars; `query.timeframe` selects the aggregation.
    pub async fn bars(
        &self,
        symbol: &str,
        query: &HistoricalQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        self.series(symbol, Series::Bars, query, cancel).await
    }

    /// Latest trade.
    pub async fn latest_trade(
        &self,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let symbol = parse_symbol(symbol)?;
        let request = routes::latest(&symbol, Series::Trades).get();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Latest quote.
    pub async fn latest_quote(
        &self,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let symbol = parse_symbol(symbol)?;
        let request = routes::latest(&symbol, Series::Quotes).get();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    async fn series(
        &self,
        symbol: &str,
        series: Series,
        query: &HistoricalQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let symbol = parse_symbol(symbol)?;
        let mut request = query.apply(routes::series(&symbol, series).get());
        if series == Series::Bars {
            request = request.with_optional_query("timeframe", query.timeframe.as_deref());
        }
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }
}
