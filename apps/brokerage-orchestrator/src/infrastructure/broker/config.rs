//! Gateway configuration.

use std::time::Duration;

/// Default client-level request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs and credential for the upstream APIs.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Brokerage API base URL.
    pub trading_base_url: String,
    /// Market-data API base URL.
    pub data_base_url: String,
    /// Raw `Authorization` header value.
    pub token: String,
    /// Request timeout. The only timeout applied to upstream calls.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a configuration with the default timeout.
    #[must_use]
    pub fn new(
        trading_base_url: impl Into<String>,
        data_base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            trading_base_url: trading_base_url.into(),
            data_base_url: data_base_url.into(),
            token: token.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("trading_base_url", &self.trading_base_url)
            .field("data_base_url", &self.data_base_url)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}
