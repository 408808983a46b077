//! Ticker snapshots from the market-data API.
//!
//! A snapshot bundles the latest trade, latest quote, the current minute and
//! daily bars and the previous daily bar for one symbol. Snapshots are a
//! read-side enrichment value: fetched fresh and merged by symbol, never
//! persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;
use crate::domain::shared::serde_helpers::null_as_default;

/// Symbol-keyed ticker snapshots. A missing key means "no data available".
pub type TickerMap = HashMap<Symbol, TickerSnapshot>;

/// OHLCV bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar start time.
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    /// Open price.
    #[serde(rename = "o")]
    pub open: Decimal,
    /// High price.
    #[serde(rename = "h")]
    pub high: Decimal,
    /// Low price.
    #[serde(rename = "l")]
    pub low: Decimal,
    /// Close price.
    #[serde(rename = "c")]
    pub close: Decimal,
    /// Volume.
    #[serde(rename = "v")]
    pub volume: u64,
    /// Trade count.
    #[serde(rename = "n", default)]
    pub trade_count: Option<u64>,
    /// Volume-weighted average price.
    #[serde(rename = "vw", default)]
    pub vwap: Option<Decimal>,
}

/// Last trade print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade time.
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    /// Exchange code.
    #[serde(rename = "x", default)]
    pub exchange: String,
    /// Trade price.
    #[serde(rename = "p")]
    pub price: Decimal,
    /// Trade size.
    #[serde(rename = "s", default)]
    pub size: u64,
    /// Trade conditions.
    #[serde(rename = "c", default, deserialize_with = "null_as_default")]
    pub conditions: Vec<String>,
    /// Trade identifier.
    #[serde(rename = "i", default)]
    pub id: Option<u64>,
    /// Tape.
    #[serde(rename = "z", default)]
    pub tape: String,
}

/// Top of book quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote time.
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    /// Ask exchange.
    #[serde(rename = "ax", default)]
    pub ask_exchange: String,
    /// Ask price.
    #[serde(rename = "ap")]
    pub ask_price: Decimal,
    /// Ask size.
    #[serde(rename = "as", default)]
    pub ask_size: u64,
    /// Bid exchange.
    #[serde(rename = "bx", default)]
    pub bid_exchange: String,
    /// Bid price.
    #[serde(rename = "bp")]
    pub bid_price: Decimal,
    /// Bid size.
    #[serde(rename = "bs", default)]
    pub bid_size: u64,
    /// Quote conditions.
    #[serde(rename = "c", default, deserialize_with = "null_as_default")]
    pub conditions: Vec<String>,
    /// Tape.
    #[serde(rename = "z", default)]
    pub tape: String,
}

/// Snapshot of one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    /// Latest trade.
    #[serde(default)]
    pub latest_trade: Option<Trade>,
    /// Latest quote.
    #[serde(default)]
    pub latest_quote: Option<Quote>,
    /// Current minute bar.
    #[serde(default)]
    pub minute_bar: Option<Bar>,
    /// Current daily bar.
    #[serde(default)]
    pub daily_bar: Option<Bar>,
    /// Previous daily bar.
    #[serde(default)]
    pub prev_daily_bar: Option<Bar>,
    /// Latest trade price minus previous close.
    #[serde(default)]
    pub todays_change: Option<Decimal>,
    /// `todays_change` as a percentage of previous close.
    #[serde(default)]
    pub todays_change_perc: Option<Decimal>,
}

impl TickerSnapshot {
    /// Fill `todays_change` and `todays_change_perc` from the latest trade
    /// and the previous daily close, when both are present.
    #[must_use]
    pub fn with_derived_change(mut self) -> Self {
        let last = self.latest_trade.as_ref().map(|t| t.price);
        let prev_close = self.prev_daily_bar.as_ref().map(|b| b.close);

        if let (Some(last), Some(prev_close)) = (last, prev_close) {
            let change = last - prev_close;
            self.todays_change = Some(change);
            self.todays_change_perc = if prev_close.is_zero() {
                None
            } else {
                Some((change / prev_close * Decimal::ONE_HUNDRED).round_dp(4))
            };
        }

        self
    }
}

/// Decode a batched snapshot payload (`{"AAPL": {...}, "MSFT": {...}}`).
///
/// Entries with a `null` snapshot are dropped, the same as symbols the
/// upstream did not return at all. An entry that does not decode is logged
/// and dropped; the rest of the batch is kept.
///
/// # Errors
///
/// Returns the decode error if the payload is not a symbol-keyed object.
pub fn decode_snapshot_batch(body: &[u8]) -> Result<TickerMap, serde_json::Error> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(body)?;
    Ok(raw
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(symbol, value)| {
            match serde_json::from_value::<TickerSnapshot>(value) {
                Ok(snapshot) => Some((Symbol::new(symbol), snapshot.with_derived_change())),
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping undecodable snapshot");
                    None
                }
            }
        })
        .collect())
}
