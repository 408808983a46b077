//! Shared wiring for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use brokerage_orchestrator::{
    AccountId, BrokerHttpGateway, Container, GatewayConfig, InMemoryProfileStore,
    StaticInstrumentCatalog, UseCaseSettings, UserId, UserProfile, WatchlistId,
};
use wiremock::MockServer;

pub type TestContainer =
    Container<BrokerHttpGateway, InMemoryProfileStore, StaticInstrumentCatalog>;

pub const TOKEN: &str = "Basic dGVzdDp0ZXN0";

/// Container whose gateway points both upstreams at `server`.
pub fn container(server: &MockServer, profiles: InMemoryProfileStore) -> TestContainer {
    let gateway =
        BrokerHttpGateway::new(&GatewayConfig::new(server.uri(), server.uri(), TOKEN)).unwrap();
    Container::new(
        Arc::new(gateway),
        Arc::new(profiles),
        Arc::new(StaticInstrumentCatalog::built_in()),
        UseCaseSettings::default(),
    )
}

/// Profile with an upstream account and no default watchlist.
pub fn onboarded(user_id: u64) -> UserProfile {
    UserProfile {
        id: UserId::new(user_id),
        email: "jo@example.com".to_string(),
        first_name: "Jo".to_string(),
        last_name: "Doe".to_string(),
        account_id: Some(AccountId::new("acct-1")),
        ..UserProfile::default()
    }
}

/// Onboarded profile with a default watchlist.
pub fn with_default_watchlist(user_id: u64, watchlist_id: &str) -> UserProfile {
    UserProfile {
        watchlist_id: Some(WatchlistId::new(watchlist_id)),
        ..onboarded(user_id)
    }
}

/// Upstream account body with the given day-trade count.
pub fn account_body(daytrade_count: u32) -> serde_json::Value {
    serde_json::json!({
        "id": "acct-1",
        "account_number": "123456789",
        "status": "ACTIVE",
        "currency": "USD",
        "buying_power": "40000.00",
        "equity": "20000.00",
        "last_equity": "19500.00",
        "cash": "10000.00",
        "daytrade_count": daytrade_count,
        "pattern_day_trader": false
    })
}

/// Upstream asset record inside a watchlist.
pub fn asset(symbol: &str) -> serde_json::Value {
    serde_json::json!({
        "id": format!("asset-{symbol}"),
        "class": "us_equity",
        "exchange": "NASDAQ",
        "symbol": symbol,
        "status": "active",
        "tradable": true
    })
}

/// Upstream snapshot with a latest trade and daily bars.
pub fn snapshot(price: f64, prev_close: f64) -> serde_json::Value {
    serde_json::json!({
        "latestTrade": {"t": "2024-01-02T15:00:00Z", "p": price, "s": 100},
        "dailyBar": {"t": "2024-01-02T05:00:00Z", "o": prev_close, "h": price, "l": prev_close, "c": price, "v": 1000},
        "prevDailyBar": {"t": "2024-01-01T05:00:00Z", "o": prev_close, "h": prev_close, "l": prev_close, "c": prev_close, "v": 900}
    })
}
