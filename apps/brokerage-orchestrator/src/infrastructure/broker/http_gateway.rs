//! reqwest-backed broker gateway.
//!
//! One shared client, no retries. The caller's cancellation token is checked
//! before dispatch and raced against the in-flight exchange.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Url};
use tokio_util::sync::CancellationToken;

use super::config::GatewayConfig;
use crate::application::ports::{
    BrokerGatewayPort, GatewayError, GatewayRequest, HttpMethod, Upstream, UpstreamResponse,
};

/// HTTP gateway to the brokerage and market-data APIs.
#[derive(Clone)]
pub struct BrokerHttpGateway {
    client: Client,
    trading_base: Url,
    data_base: Url,
    token: String,
}

impl BrokerHttpGateway {
    /// Build the gateway from configuration.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` if a base URL does not parse, `Transport` if the HTTP
    /// client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            trading_base: parse_base(&config.trading_base_url)?,
            data_base: parse_base(&config.data_base_url)?,
            token: config.token.clone(),
        })
    }

    /// Full URL for a request: base, escaped segments, encoded query.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` if the base URL cannot take path segments.
    pub fn url_for(&self, request: &GatewayRequest) -> Result<Url, GatewayError> {
        let mut url = match request.upstream {
            Upstream::Trading => self.trading_base.clone(),
            Upstream::MarketData => self.data_base.clone(),
        };

        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl {
                message: "base URL cannot take path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<(u16, Vec<u8>), reqwest::Error> {
        let mut builder = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, self.token.as_str());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        Ok((status, bytes.to_vec()))
    }
}

impl std::fmt::Debug for BrokerHttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerHttpGateway")
            .field("trading_base", &self.trading_base.as_str())
            .field("data_base", &self.data_base.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BrokerGatewayPort for BrokerHttpGateway {
    async fn send(
        &self,
        request: GatewayRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, GatewayError> {
        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }

        let url = self.url_for(&request)?;
        let method = to_reqwest(request.method);
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(
                    method = %request.method,
                    upstream = request.upstream.as_str(),
                    path = %request.path(),
                    "Upstream call cancelled in flight"
                );
                return Err(GatewayError::Cancelled);
            }
            result = self.exchange(method, url, request.body.as_ref()) => result,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok((status, body)) => {
                tracing::debug!(
                    method = %request.method,
                    upstream = request.upstream.as_str(),
                    path = %request.path(),
                    status,
                    elapsed_ms,
                    "Upstream call completed"
                );
                Ok(UpstreamResponse::new(status, body))
            }
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    upstream = request.upstream.as_str(),
                    path = %request.path(),
                    elapsed_ms,
                    timeout = e.is_timeout(),
                    error = %e,
                    "Upstream call failed"
                );
                Err(GatewayError::Transport {
                    message: e.to_string(),
                })
            }
        }
    }
}

fn parse_base(raw: &str) -> Result<Url, GatewayError> {
    let url = Url::parse(raw.trim()).map_err(|e| GatewayError::InvalidUrl {
        message: format!("{raw}: {e}"),
    })?;
    if url.cannot_be_a_base() {
        return Err(GatewayError::InvalidUrl {
            message: format!("{raw}: not a base URL"),
        });
    }
    Ok(url)
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(trading: &str) -> BrokerHttpGateway {
        BrokerHttpGateway::new(&GatewayConfig::new(
            trading,
            "https://data.example.com",
            "Basic dG9rZW4=",
        ))
        .unwrap()
    }

    #[test]
    fn segments_are_escaped() {
        let gateway = gateway("https://broker.example.com");
        let request = GatewayRequest::new(
            Upstream::Trading,
            HttpMethod::Delete,
            ["v1", "trading", "accounts", "acct/../x", "positions", "BTC/USD"],
        );

        let url = gateway.url_for(&request).unwrap();

        assert_eq!(
            url.as_str(),
            "https://broker.example.com/v1/trading/accounts/acct%2F..%2Fx/positions/BTC%2FUSD"
        );
    }

    #[test]
    fn base_path_and_trailing_slash_are_kept() {
        let gateway = gateway("https://broker.example.com/api/");
        let request = GatewayRequest::new(Upstream::Trading, HttpMethod::Get, ["v1", "clock"]);

        assert_eq!(
            gateway.url_for(&request).unwrap().as_str(),
            "https://broker.example.com/api/v1/clock"
        );
    }

    #[test]
    fn query_is_encoded() {
        let gateway = gateway("https://broker.example.com");
        let request = GatewayRequest::new(
            Upstream::MarketData,
            HttpMethod::Get,
            ["v2", "stocks", "snapshots"],
        )
        .with_query("symbols", "AAPL,BRK.B");

        assert_eq!(
            gateway.url_for(&request).unwrap().as_str(),
            "https://data.example.com/v2/stocks/snapshots?symbols=AAPL%2CBRK.B"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = BrokerHttpGateway::new(&GatewayConfig::new("not a url", "https://d", "t"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUrl { .. }));
    }

    #[test]
    fn debug_hides_token() {
        let debug = format!("{:?}", gateway("https://broker.example.com"));
        assert!(!debug.contains("dG9rZW4="));
    }

    #[tokio::test]
    async fn pre_cancelled_token_skips_dispatch() {
        let gateway = gateway("http://127.0.0.1:9");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = gateway
            .send(
                GatewayRequest::new(Upstream::Trading, HttpMethod::Get, ["v1", "clock"]),
                &cancel,
            )
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Cancelled);
    }
}
