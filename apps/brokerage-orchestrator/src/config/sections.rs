//! Configuration sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::use_cases::DEFAULT_LIST_FANOUT;
use crate::domain::account::DEFAULT_DAYTRADE_CEILING;
use crate::infrastructure::broker::DEFAULT_REQUEST_TIMEOUT;

/// Upstream endpoints and credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct BrokerSettings {
    /// Brokerage API base URL.
    #[serde(default = "default_trading_base_url")]
    pub trading_base_url: String,
    /// Market-data API base URL.
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,
    /// Raw `Authorization` header value.
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BrokerSettings {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            trading_base_url: default_trading_base_url(),
            data_base_url: default_data_base_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for BrokerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerSettings")
            .field("trading_base_url", &self.trading_base_url)
            .field("data_base_url", &self.data_base_url)
            .field("token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Order guard settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardSettings {
    /// Orders are blocked once the day-trade count reaches this value.
    #[serde(default = "default_daytrade_ceiling")]
    pub daytrade_ceiling: u32,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            daytrade_ceiling: default_daytrade_ceiling(),
        }
    }
}

/// Enrichment settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    /// Concurrent watchlist fetches when listing.
    #[serde(default = "default_list_fanout")]
    pub list_fanout: usize,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            list_fanout: default_list_fanout(),
        }
    }
}

fn default_trading_base_url() -> String {
    "https://broker-api.sandbox.alpaca.markets".to_string()
}

fn default_data_base_url() -> String {
    "https://data.sandbox.alpaca.markets".to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

const fn default_daytrade_ceiling() -> u32 {
    DEFAULT_DAYTRADE_CEILING
}

const fn default_list_fanout() -> usize {
    DEFAULT_LIST_FANOUT
}
