//! Upstream route table.
//!
//! Every upstream path the orchestrator calls is built here, from raw
//! segments the gateway escapes individually.

use crate::application::ports::{GatewayRequest, HttpMethod, Upstream};
use crate::domain::shared::{AccountId, Symbol, WatchlistId};

/// Upstream path without a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    upstream: Upstream,
    segments: Vec<String>,
}

impl Route {
    fn trading<const N: usize>(segments: [&str; N]) -> Self {
        Self {
            upstream: Upstream::Trading,
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn market_data<const N: usize>(segments: [&str; N]) -> Self {
        Self {
            upstream: Upstream::MarketData,
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn request(self, method: HttpMethod) -> GatewayRequest {
        GatewayRequest::new(self.upstream, method, self.segments)
    }

    /// GET request on this route.
    #[must_use]
    pub fn get(self) -> GatewayRequest {
        self.request(HttpMethod::Get)
    }

    /// POST request on this route.
    #[must_use]
    pub fn post(self) -> GatewayRequest {
        self.request(HttpMethod::Post)
    }

    /// PUT request on this route.
    #[must_use]
    pub fn put(self) -> GatewayRequest {
        self.request(HttpMethod::Put)
    }

    /// PATCH request on this route.
    #[must_use]
    pub fn patch(self) -> GatewayRequest {
        self.request(HttpMethod::Patch)
    }

    /// DELETE request on this route.
    #[must_use]
    pub fn delete(self) -> GatewayRequest {
        self.request(HttpMethod::Delete)
    }
}

// Brokerage API

/// `/v1/accounts`
#[must_use]
pub fn accounts() -> Route {
    Route::trading(["v1", "accounts"])
}

/// `/v1/trading/accounts/{id}/account`
#[must_use]
pub fn account(account_id: &AccountId) -> Route {
    Route::trading(["v1", "trading", "accounts", account_id.as_str(), "account"])
}

/// `/v1/trading/accounts/{id}/account/portfolio/history`
#[must_use]
pub fn portfolio_history(account_id: &AccountId) -> Route {
    Route::trading([
        "v1",
        "trading",
        "accounts",
        account_id.as_str(),
        "account",
        "portfolio",
        "history",
    ])
}

/// `/v1/trading/accounts/{id}/orders`
#[must_use]
pub fn orders(account_id: &AccountId) -> Route {
    Route::trading(["v1", "trading", "accounts", account_id.as_str(), "orders"])
}

/// `/v1/trading/accounts/{id}/orders/{order_id}`
#[must_use]
pub fn order(account_id: &AccountId, order_id: &str) -> Route {
    Route::trading([
        "v1",
        "trading",
        "accounts",
        account_id.as_str(),
        "orders",
        order_id,
    ])
}

/// `/v1/trading/accounts/{id}/positions`
#[must_use]
pub fn positions(account_id: &AccountId) -> Route {
    Route::trading(["v1", "trading", "accounts", account_id.as_str(), "positions"])
}

/// `/v1/trading/accounts/{id}/positions/{symbol}`
#[must_use]
pub fn position(account_id: &AccountId, symbol: &Symbol) -> Route {
    Route::trading([
        "v1",
        "trading",
        "accounts",
        account_id.as_str(),
        "positions",
        symbol.as_str(),
    ])
}

/// `/v1/trading/accounts/{id}/watchlists`
#[must_use]
pub fn watchlists(account_id: &AccountId) -> Route {
    Route::trading(["v1", "trading", "accounts", account_id.as_str(), "watchlists"])
}

/// `/v1/trading/accounts/{id}/watchlists/{wid}`
#[must_use]
pub fn watchlist(account_id: &AccountId, watchlist_id: &WatchlistId) -> Route {
    Route::trading([
        "v1",
        "trading",
        "accounts",
        account_id.as_str(),
        "watchlists",
        watchlist_id.as_str(),
    ])
}

/// `/v1/trading/accounts/{id}/watchlists/{wid}/{symbol}`
#[must_use]
pub fn watchlist_asset(account_id: &AccountId, watchlist_id: &WatchlistId, symbol: &Symbol) -> Route {
    Route::trading([
        "v1",
        "trading",
        "accounts",
        account_id.as_str(),
        "watchlists",
        watchlist_id.as_str(),
        symbol.as_str(),
    ])
}

/// `/v2/calendar`
#[must_use]
pub fn calendar() -> Route {
    Route::trading(["v2", "calendar"])
}

/// `/v1/clock`
#[must_use]
pub fn clock() -> Route {
    Route::trading(["v1", "clock"])
}

// Market-data API

/// `/v2/stocks/snapshots`
#[must_use]
pub fn snapshots() -> Route {
    Route::market_data(["v2", "stocks", "snapshots"])
}

/// `/v2/stocks/{symbol}/snapshot`
#[must_use]
pub fn snapshot(symbol: &Symbol) -> Route {
    Route::market_data(["v2", "stocks", symbol.as_str(), "snapshot"])
}

/// Historical series for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    /// `/v2/stocks/{symbol}/trades`
    Trades,
    /// `/v2/stocks/{symbol}/quotes`
    Quotes,
    /// `/v2/stocks/{symbol}/bars`
    Bars,
}

impl Series {
    const fn segment(self) -> &'static str {
        match self {
            Self::Trades => "trades",
            Self::Quotes => "quotes",
            Self::Bars => "bars",
        }
    }
}

/// `/v2/stocks/{symbol}/{trades|quotes|bars}`
#[must_use]
pub fn series(symbol: &Symbol, series: Series) -> Route {
    Route::market_data(["v2", "stocks", symbol.as_str(), series.segment()])
}

/// `/v2/stocks/{symbol}/{trades|quotes}/latest`
#[must_use]
pub fn latest(symbol: &Symbol, series: Series) -> Route {
    Route::market_data(["v2", "stocks", symbol.as_str(), series.segment(), "latest"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trading_paths() {
        let acct = AccountId::new("acct-1");
        let wl = WatchlistId::new("wl-1");

        assert_eq!(accounts().post().path(), "/v1/accounts");
        assert_eq!(account(&acct).get().path(), "/v1/trading/accounts/acct-1/account");
        assert_eq!(
            watchlist_asset(&acct, &wl, &Symbol::new("AAPL")).delete().path(),
            "/v1/trading/accounts/acct-1/watchlists/wl-1/AAPL"
        );
        assert_eq!(calendar().get().upstream, Upstream::Trading);
    }

    #[test]
    fn market_data_paths() {
        let aapl = Symbol::new("AAPL");
        let request = latest(&aapl, Series::Quotes).get();

        assert_eq!(request.upstream, Upstream::MarketData);
        assert_eq!(request.path(), "/v2/stocks/AAPL/quotes/latest");
        assert_eq!(series(&aapl, Series::Bars).get().path(), "/v2/stocks/AAPL/bars");
    }
}
