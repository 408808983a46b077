//! Broker Gateway Port (Driven Port)
//!
//! Thin, retryless interface to the brokerage and market-data HTTP APIs.
//! A non-2xx status is *not* an error at this level: the response comes back
//! with its status and raw body and callers decide how to surface it. Only
//! failures to complete the exchange (connection refused, timeout,
//! cancellation) are errors.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Which upstream API a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    /// Brokerage API (accounts, orders, positions, watchlists, calendar).
    Trading,
    /// Market-data API (snapshots, trades, quotes, bars).
    MarketData,
}

impl Upstream {
    /// Short name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trading => "trading",
            Self::MarketData => "market_data",
        }
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request.
///
/// The path is kept as raw segments; the gateway percent-encodes each one
/// so identifiers and symbols can never alter the route.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    /// Target API.
    pub upstream: Upstream,
    /// HTTP method.
    pub method: HttpMethod,
    /// Unencoded path segments.
    pub segments: Vec<String>,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl GatewayRequest {
    /// Create a request without query or body.
    pub fn new<I, S>(upstream: Upstream, method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            upstream,
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append a query parameter when a value is present.
    #[must_use]
    pub fn with_optional_query<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_query(key, v.to_string()),
            None => self,
        }
    }

    /// Attach a raw JSON body.
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize and attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Encode` if the body cannot be represented as JSON.
    pub fn with_body<B: Serialize>(self, body: &B) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(body).map_err(|e| GatewayError::Encode {
            message: e.to_string(),
        })?;
        Ok(self.with_json(value))
    }

    /// Slash-joined path, for logs and test assertions.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Raw upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body as a JSON value for verbatim pass-through.
    ///
    /// An empty body becomes `null`; a non-JSON body becomes a JSON string.
    #[must_use]
    pub fn json_value(&self) -> serde_json::Value {
        if self.body.is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_slice(&self.body).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&self.body).into_owned())
        })
    }
}

/// Gateway error. Only failures to complete the HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Connection refused, timeout, or body read failure.
    #[error("Upstream transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// Base URL and path did not form a valid URL.
    #[error("Invalid upstream URL: {message}")]
    InvalidUrl {
        /// Error details.
        message: String,
    },

    /// Request body could not be encoded.
    #[error("Request body encoding failed: {message}")]
    Encode {
        /// Error details.
        message: String,
    },

    /// The caller cancelled before or during the call.
    #[error("Upstream call cancelled")]
    Cancelled,
}

/// Port for issuing authenticated requests to the upstream APIs.
#[async_trait]
pub trait BrokerGatewayPort: Send + Sync {
    /// Send a request and return the raw status and body.
    ///
    /// Implementations must not issue the request if `cancel` is already
    /// cancelled, and must abandon an in-flight request when it fires.
    async fn send(
        &self,
        request: GatewayRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, GatewayError>;
}
