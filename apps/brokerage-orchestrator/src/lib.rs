// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Brokerage Orchestrator - Rust Core Library
//!
//! Sits between the account service and the upstream brokerage / market-data
//! APIs. Translates user actions into upstream call sequences, enforces the
//! day-trade guard before order placement, and merges positions, watchlists
//! and ticker snapshots into single enriched views keyed by symbol.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Upstream records and pure merge logic
//!   - `account`: Account snapshot, day-trade policy
//!   - `market_data`: Ticker snapshots, bars, quotes, trades
//!   - `watchlist`: Watchlists and their enrichment
//!   - `position`: Positions and their enrichment
//!   - `onboarding`: Account application payload and receipt
//!   - `profile`: Local user record and partial updates
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `BrokerGatewayPort`, `ProfilePort`, `InstrumentCatalogPort`
//!   - `use_cases`: `OrderGuard`, `OrderDesk`, `MarketDataJoiner`,
//!     `WatchlistSynchronizer`, `AccountOnboarder`, `AccountDesk`, `MarketQueries`
//!   - `dto`: Pass-through replies, enriched results, query parameters
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `broker`: reqwest-backed gateway
//!   - `persistence`: In-memory profile store
//!   - `catalog`: Static instrument catalog
//!   - `config`: Dependency injection container
//!
//! Every use case takes a [`tokio_util::sync::CancellationToken`]; a cancelled
//! token stops the chain before its next upstream call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Upstream records and merge logic.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading (environment and YAML).
pub mod config;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::account::{AccountSnapshot, DEFAULT_DAYTRADE_CEILING, DaytradePolicy};
pub use domain::market_data::{TickerMap, TickerSnapshot};
pub use domain::position::{EnrichedPosition, Position};
pub use domain::profile::{ProfilePatch, UserProfile};
pub use domain::shared::{AccountId, Symbol, UserId, WatchlistId};
pub use domain::watchlist::{EnrichedWatchlist, Watchlist, WatchlistAsset};

// Application re-exports
pub use application::dto::{Enriched, EnrichmentError, UpstreamReply};
pub use application::error::{GuardBlockReason, OrchestrationError};
pub use application::ports::{
    BrokerGatewayPort, GatewayError, GatewayRequest, HttpMethod, InstrumentCatalogPort,
    ProfileError, ProfilePort, Upstream, UpstreamResponse,
};
pub use application::use_cases::{
    AccountDesk, AccountOnboarder, Authorization, MarketDataJoiner, MarketQueries, OrderDesk,
    OrderGuard, WatchlistSynchronizer,
};

// Infrastructure re-exports
pub use config::{ConfigError, OrchestratorConfig, load_config};
pub use infrastructure::broker::{BrokerHttpGateway, GatewayConfig};
pub use infrastructure::catalog::StaticInstrumentCatalog;
pub use infrastructure::config::{Container, UseCaseSettings};
pub use infrastructure::persistence::InMemoryProfileStore;
