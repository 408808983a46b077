//! Open positions and their enrichment.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::market_data::{TickerMap, TickerSnapshot};
use crate::domain::shared::Symbol;

/// Open position as returned by the brokerage API.
///
/// Fields the orchestrator does not interpret are kept in `extra` so the
/// enriched view still carries the full upstream record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Signed quantity.
    pub qty: Decimal,
    /// Position side (long, short).
    #[serde(default)]
    pub side: String,
    /// Average entry price.
    #[serde(default)]
    pub avg_entry_price: Option<Decimal>,
    /// Current market value.
    #[serde(default)]
    pub market_value: Option<Decimal>,
    /// Latest price known to the broker.
    #[serde(default)]
    pub current_price: Option<Decimal>,
    /// Unrealized profit / loss.
    #[serde(default)]
    pub unrealized_pl: Option<Decimal>,
    /// Remaining upstream fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Position with instrument name, ticker snapshot and watchlist membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPosition {
    /// The upstream position record.
    #[serde(flatten)]
    pub position: Position,
    /// Instrument name from the static catalog.
    pub name: Option<String>,
    /// Ticker snapshot, `None` when no market data is available.
    pub ticker: Option<TickerSnapshot>,
    /// Whether the symbol is on the user's default watchlist.
    pub is_watchlisted: bool,
}

/// Merge positions with catalog names, tickers and default-watchlist membership.
///
/// `watchlisted` is `None` when the user has no default watchlist or it could
/// not be fetched; every position is then reported as not watchlisted.
#[must_use]
pub fn enrich_positions(
    positions: &[Position],
    name_for: impl Fn(&Symbol) -> Option<String>,
    tickers: &TickerMap,
    watchlisted: Option<&HashSet<Symbol>>,
) -> Vec<EnrichedPosition> {
    positions
        .iter()
        .map(|position| EnrichedPosition {
            name: name_for(&position.symbol),
            ticker: tickers.get(&position.symbol).cloned(),
            is_watchlisted: watchlisted.is_some_and(|set| set.contains(&position.symbol)),
            position: position.clone(),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::position;
    use super::*;

    #[test]
    fn watchlisted_flag_follows_membership() {
        let positions = vec![position("AAPL", 10), position("TSLA", 5)];
        let watchlisted: HashSet<Symbol> = [Symbol::new("AAPL")].into_iter().collect();

        let enriched = enrich_positions(&positions, |_| None, &TickerMap::new(), Some(&watchlisted));

        assert!(enriched[0].is_watchlisted);
        assert!(!enriched[1].is_watchlisted);
    }

    #[test]
    fn no_default_watchlist_means_not_watchlisted() {
        let positions = vec![position("AAPL", 10)];
        let enriched = enrich_positions(&positions, |_| None, &TickerMap::new(), None);
        assert!(!enriched[0].is_watchlisted);
    }

    #[test]
    fn attaches_names_and_tickers_by_symbol() {
        let positions = vec![position("AAPL", 10), position("MSFT", 1)];
        let mut tickers = TickerMap::new();
        tickers.insert(Symbol::new("MSFT"), TickerSnapshot::default());

        let enriched = enrich_positions(
            &positions,
            |s| (s.as_str() == "AAPL").then(|| "Apple Inc.".to_string()),
            &tickers,
            None,
        );

        assert_eq!(enriched[0].name.as_deref(), Some("Apple Inc."));
        assert!(enriched[0].ticker.is_none());
        assert!(enriched[1].name.is_none());
        assert!(enriched[1].ticker.is_some());
    }

    #[test]
    fn unknown_upstream_fields_survive_enrichment() {
        let json = r#"[{
            "asset_id": "904837e3",
            "symbol": "AAPL",
            "exchange": "NASDAQ",
            "asset_class": "us_equity",
            "qty": "10",
            "avg_entry_price": "150.25",
            "side": "long",
            "market_value": "1811.8",
            "cost_basis": "1502.5",
            "unrealized_pl": "309.3",
            "current_price": "181.18",
            "change_today": "-0.004"
        }]"#;
        let positions: Vec<Position> = serde_json::from_str(json).unwrap();
        let enriched = enrich_positions(&positions, |_| None, &TickerMap::new(), None);

        let value = serde_json::to_value(&enriched[0]).unwrap();
        assert_eq!(value["cost_basis"], "1502.5");
        assert_eq!(value["asset_id"], "904837e3");
        assert_eq!(value["is_watchlisted"], false);
    }
}
