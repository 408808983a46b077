//! Domain Layer
//!
//! Upstream records and the pure logic that merges them. Nothing in this
//! layer performs I/O; every enrichment builds a new structure and leaves
//! the source records untouched.
//!
//! # Modules
//!
//! - [`account`]: Account snapshot and the day-trade policy
//! - [`market_data`]: Ticker snapshots keyed by symbol
//! - [`watchlist`]: Watchlists, their assets and ticker enrichment
//! - [`position`]: Open positions and their enrichment
//! - [`onboarding`]: Account application payload built from a profile
//! - [`profile`]: Local user record and narrow partial updates

pub mod account;
pub mod market_data;
pub mod onboarding;
pub mod position;
pub mod profile;
pub mod shared;
pub mod watchlist;
