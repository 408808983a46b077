//! Data Transfer Objects (DTOs)
//!
//! Use case inputs and outputs that are not upstream records themselves.

mod enriched;
mod query;
mod reply;

pub use enriched::{Enriched, EnrichmentError, EnrichmentFailure, EnrichmentStage};
pub use query::{CalendarQuery, HistoricalQuery, OrderListQuery, PortfolioHistoryQuery};
pub use reply::UpstreamReply;
