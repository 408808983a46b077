//! Broker Adapters
//!
//! Implementation of `BrokerGatewayPort` over HTTP.

mod config;
mod http_gateway;

pub use config::{DEFAULT_REQUEST_TIMEOUT, GatewayConfig};
pub use http_gateway::BrokerHttpGateway;
