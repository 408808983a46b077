//! Brokerage Orchestrator Binary
//!
//! Loads configuration, wires the adapters, and probes the upstream market
//! clock to confirm connectivity and credentials.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin brokerage-orchestrator
//! ```
//!
//! # Environment Variables
//!
//! ## Configuration source
//! - `ORCHESTRATOR_CONFIG`: Path to a YAML config file. When unset, the
//!   variables below are read directly.
//!
//! ## Required
//! - `BROKER_TOKEN`: Raw `Authorization` header value for upstream calls
//!
//! ## Optional
//! - `BROKER_API_BASE`: Brokerage API base URL
//! - `BROKER_API_DATA_BASE`: Market-data API base URL
//! - `BROKER_TIMEOUT_SECS`: Request timeout (default: 30)
//! - `DAYTRADE_CEILING`: Order guard ceiling (default: 3)
//! - `WATCHLIST_FANOUT`: Concurrent watchlist fetches (default: 4)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use brokerage_orchestrator::{
    BrokerHttpGateway, Container, InMemoryProfileStore, OrchestrationError, OrchestratorConfig,
    StaticInstrumentCatalog, load_config,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    tracing::info!("Starting Brokerage Orchestrator");

    let config = match std::env::var("ORCHESTRATOR_CONFIG") {
        Ok(path) if !path.trim().is_empty() => {
            load_config(&path).with_context(|| format!("loading {path}"))?
        }
        _ => OrchestratorConfig::from_env().context("reading environment")?,
    };
    log_config(&config);

    let gateway = BrokerHttpGateway::new(&config.gateway_config())
        .context("building broker gateway")?;
    let container = Container::new(
        Arc::new(gateway),
        Arc::new(InMemoryProfileStore::new()),
        Arc::new(StaticInstrumentCatalog::built_in()),
        config.use_case_settings(),
    );

    let shutdown_token = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown_token.clone()));

    match container.account_desk().clock(&shutdown_token).await {
        Ok(reply) => {
            tracing::info!(status = reply.status, clock = %reply.body, "Upstream reachable");
        }
        Err(OrchestrationError::Cancelled) => {
            tracing::info!("Shutdown requested before probe completed");
        }
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "Clock probe failed");
            return Err(e.into());
        }
    }

    tracing::info!("Brokerage Orchestrator stopped");
    Ok(())
}

/// Initialize the tracing subscriber from `RUST_LOG`.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "brokerage_orchestrator=info"
                    .parse()
                    .expect("static directive is valid"),
            ),
        )
        .init();
}

/// Log the parsed configuration. The token is never logged.
fn log_config(config: &OrchestratorConfig) {
    tracing::info!(
        trading_base_url = %config.broker.trading_base_url,
        data_base_url = %config.broker.data_base_url,
        timeout_secs = config.broker.timeout_secs,
        daytrade_ceiling = config.guard.daytrade_ceiling,
        list_fanout = config.enrichment.list_fanout,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Cancel `token` on Ctrl+C.
async fn cancel_on_ctrl_c(token: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C, cancelling in-flight work");
            token.cancel();
        }
        Err(e) => tracing::warn!(error = %e, "Could not install Ctrl+C handler"),
    }
}
