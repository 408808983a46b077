//! Application Use Cases
//!
//! Use cases orchestrate upstream calls and domain logic. Each one takes a
//! `CancellationToken` and stops before its next upstream call once the
//! token fires.

mod account_desk;
mod account_onboarder;
mod market_data_joiner;
mod market_queries;
mod order_desk;
mod order_guard;
mod support;
mod watchlist_sync;

pub use account_desk::AccountDesk;
pub use account_onboarder::{AccountOnboarder, Clock};
pub use market_data_joiner::MarketDataJoiner;
pub use market_queries::MarketQueries;
pub use order_desk::OrderDesk;
pub use order_guard::{Authorization, OrderGuard};
pub use watchlist_sync::{DEFAULT_LIST_FANOUT, WatchlistSynchronizer};
