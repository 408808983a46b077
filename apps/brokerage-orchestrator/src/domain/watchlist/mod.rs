//! Watchlists and their ticker enrichment.
//!
//! Lifecycle per identifier: `absent → created → updated* → deleted`.
//! Upstream is authoritative; the local default-watchlist reference on a
//! profile is only a cache of the upstream identifier.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::market_data::{TickerMap, TickerSnapshot};
use crate::domain::shared::serde_helpers::null_as_default;
use crate::domain::shared::{AccountId, Symbol, WatchlistId};

/// Name given to the watchlist created on a user's first "watch" action.
pub const DEFAULT_WATCHLIST_NAME: &str = "Watchlist assets";

/// Asset record as returned inside an upstream watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Upstream asset identifier.
    #[serde(default)]
    pub id: String,
    /// Asset class (us_equity, crypto).
    #[serde(default)]
    pub class: String,
    /// Listing exchange.
    #[serde(default)]
    pub exchange: String,
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Company name, when upstream provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Asset status (active, inactive).
    #[serde(default)]
    pub status: String,
    /// Tradable at the broker.
    #[serde(default)]
    pub tradable: bool,
    /// Marginable at the broker.
    #[serde(default)]
    pub marginable: bool,
    /// Shortable at the broker.
    #[serde(default)]
    pub shortable: bool,
    /// Easy to borrow.
    #[serde(default)]
    pub easy_to_borrow: bool,
}

/// Watchlist as returned by the brokerage API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    /// Upstream watchlist identifier.
    pub id: WatchlistId,
    /// Owning account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Ordered assets. Upstream sends `null` for an empty list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<AssetRecord>,
}

impl Watchlist {
    /// Asset symbols in watchlist order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.assets.iter().map(|a| a.symbol.clone()).collect()
    }

    /// Set of asset symbols, for membership tests.
    #[must_use]
    pub fn symbol_set(&self) -> HashSet<Symbol> {
        self.assets.iter().map(|a| a.symbol.clone()).collect()
    }

    /// Whether the watchlist currently holds `symbol`.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.assets.iter().any(|a| &a.symbol == symbol)
    }

    /// Build an enriched copy, attaching tickers by exact symbol match.
    ///
    /// Assets without a matching ticker keep `ticker: None`.
    #[must_use]
    pub fn enrich(&self, tickers: &TickerMap) -> EnrichedWatchlist {
        self.build_enriched(|symbol| tickers.get(symbol).cloned())
    }

    /// Build an enriched copy with every `ticker` left empty.
    #[must_use]
    pub fn without_tickers(&self) -> EnrichedWatchlist {
        self.build_enriched(|_| None)
    }

    fn build_enriched(
        &self,
        ticker_for: impl Fn(&Symbol) -> Option<TickerSnapshot>,
    ) -> EnrichedWatchlist {
        EnrichedWatchlist {
            id: self.id.clone(),
            account_id: self.account_id.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            assets: self
                .assets
                .iter()
                .map(|asset| WatchlistAsset {
                    ticker: ticker_for(&asset.symbol),
                    asset: asset.clone(),
                })
                .collect(),
        }
    }
}

/// Asset with its ticker snapshot attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistAsset {
    /// The upstream asset record.
    #[serde(flatten)]
    pub asset: AssetRecord,
    /// Ticker snapshot, `None` when no market data is available.
    pub ticker: Option<TickerSnapshot>,
}

/// Watchlist whose assets carry ticker snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedWatchlist {
    /// Upstream watchlist identifier.
    pub id: WatchlistId,
    /// Owning account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    /// Display name.
    pub name: String,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Enriched assets in watchlist order.
    pub assets: Vec<WatchlistAsset>,
}

impl EnrichedWatchlist {
    /// Asset symbols in watchlist order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.assets.iter().map(|a| a.asset.symbol.clone()).collect()
    }
}

/// Payload for `POST /watchlists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWatchlistRequest {
    /// Display name.
    pub name: String,
    /// Initial symbols.
    pub symbols: Vec<Symbol>,
}

/// Payload for `PUT /watchlists/{id}`; replaces name and asset set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWatchlistRequest {
    /// New display name.
    pub name: String,
    /// Replacement symbols.
    pub symbols: Vec<Symbol>,
}

/// Payload for `POST /watchlists/{id}`; appends one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddAssetRequest {
    /// Symbol to append.
    pub symbol: Symbol,
}
