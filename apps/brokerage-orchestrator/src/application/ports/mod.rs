//! Application Ports (Driven)
//!
//! Ports define the interfaces the use cases need from the outside world:
//! the upstream HTTP APIs, the local profile store, and static reference data.

mod broker_gateway_port;
mod instrument_catalog_port;
mod profile_port;

#[cfg(test)]
pub(crate) mod testing;

pub use broker_gateway_port::{
    BrokerGatewayPort, GatewayError, GatewayRequest, HttpMethod, Upstream, UpstreamResponse,
};
pub use instrument_catalog_port::InstrumentCatalogPort;
pub use profile_port::{ProfileError, ProfilePort};
