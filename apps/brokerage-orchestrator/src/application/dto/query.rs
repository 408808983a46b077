//! Query parameters for pass-through reads.
//!
//! Every field is optional; unset fields are omitted from the upstream
//! query string and the upstream default applies.

use serde::{Deserialize, Serialize};

use crate::application::ports::GatewayRequest;

/// Range query for historical trades, quotes and bars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalQuery {
    /// Inclusive start (RFC 3339 or `YYYY-MM-DD`).
    pub start: Option<String>,
    /// Exclusive end (RFC 3339 or `YYYY-MM-DD`).
    pub end: Option<String>,
    /// Maximum items per page.
    pub limit: Option<u32>,
    /// Continuation token from the previous page.
    pub page_token: Option<String>,
    /// Bar aggregation (`1Min`, `1Day`, ...); only used for bars.
    pub timeframe: Option<String>,
}

impl HistoricalQuery {
    pub(crate) fn apply(&self, request: GatewayRequest) -> GatewayRequest {
        request
            .with_optional_query("start", self.start.as_deref())
            .with_optional_query("end", self.end.as_deref())
            .with_optional_query("limit", self.limit)
            .with_optional_query("page_token", self.page_token.as_deref())
    }
}

/// Portfolio history query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioHistoryQuery {
    /// Window length (`1D`, `1M`, `1A`, ...).
    pub period: Option<String>,
    /// Resolution (`1Min`, `15Min`, `1H`, `1D`).
    pub timeframe: Option<String>,
    /// Window end date, `YYYY-MM-DD`.
    pub date_end: Option<String>,
    /// Include extended-hours data.
    pub extended_hours: Option<bool>,
}

impl PortfolioHistoryQuery {
    pub(crate) fn apply(&self, request: GatewayRequest) -> GatewayRequest {
        request
            .with_optional_query("period", self.period.as_deref())
            .with_optional_query("timeframe", self.timeframe.as_deref())
            .with_optional_query("date_end", self.date_end.as_deref())
            .with_optional_query("extended_hours", self.extended_hours)
    }
}

/// Market calendar range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarQuery {
    /// First day, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Last day, `YYYY-MM-DD`.
    pub end: Option<String>,
}

impl CalendarQuery {
    pub(crate) fn apply(&self, request: GatewayRequest) -> GatewayRequest {
        request
            .with_optional_query("start", self.start.as_deref())
            .with_optional_query("end", self.end.as_deref())
    }
}

/// Order listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderListQuery {
    /// `open`, `closed` or `all`.
    pub status: Option<String>,
    /// Maximum orders returned.
    pub limit: Option<u32>,
    /// Only orders after this time.
    pub after: Option<String>,
    /// Only orders until this time.
    pub until: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
    /// Comma-separated symbols.
    pub symbols: Option<String>,
}

impl OrderListQuery {
    pub(crate) fn apply(&self, request: GatewayRequest) -> GatewayRequest {
        request
            .with_optional_query("status", self.status.as_deref())
            .with_optional_query("limit", self.limit)
            .with_optional_query("after", self.after.as_deref())
            .with_optional_query("until", self.until.as_deref())
            .with_optional_query("direction", self.direction.as_deref())
            .with_optional_query("symbols", self.symbols.as_deref())
    }
}
