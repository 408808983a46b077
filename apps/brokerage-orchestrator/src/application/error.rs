//! Orchestration errors.
//!
//! Every use case returns [`OrchestrationError`]. Each variant carries an
//! HTTP-style status classification and a stable reason code so an outer
//! surface can map errors without matching on messages.
//!
//! | Reason | Status | Usage |
//! |--------|--------|-------|
//! | `NOT_ONBOARDED` | 400 | Profile has no brokerage account |
//! | `INVALID_INPUT` | 400 | Empty or malformed symbol, bad payload |
//! | `DAYTRADE_LIMIT_REACHED` | 422 | Guard blocked: ceiling reached |
//! | `GUARD_UNAVAILABLE` | 503 | Guard blocked: could not evaluate |
//! | `UPSTREAM_REJECTED` | upstream | Non-2xx from the upstream API |
//! | `UPSTREAM_UNAVAILABLE` | 502 | Transport failure |
//! | `MALFORMED_UPSTREAM_RESPONSE` | 502 | 2xx body did not decode |
//! | `CANCELLED` | 499 | Caller cancelled |
//! | `PROFILE_NOT_FOUND` | 404 | Profile store has no record |
//! | `PROFILE_STORE_ERROR` | 500 | Profile store failure |
//! | `RECONCILIATION_PENDING` | 500 | Upstream mutated, local write missing |

use serde_json::Value;

use crate::application::ports::{GatewayError, ProfileError};
use crate::domain::shared::DomainError;

/// Why the order guard refused an order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardBlockReason {
    /// The account's day-trade count has reached the ceiling.
    #[error("day-trade count {daytrade_count} has reached the limit of {ceiling}")]
    CeilingReached {
        /// Count reported by the broker.
        daytrade_count: u32,
        /// Configured ceiling.
        ceiling: u32,
    },

    /// The account snapshot could not be fetched or decoded.
    #[error("day-trade count could not be verified: {message}")]
    EvaluationFailed {
        /// Underlying failure.
        message: String,
    },
}

/// Application-level error returned by every use case.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrchestrationError {
    /// The profile has no upstream brokerage account.
    #[error("Account not found: brokerage account has not been opened")]
    NotOnboarded,

    /// The upstream API could not be reached.
    #[error("Upstream unavailable: {message}")]
    UpstreamTransport {
        /// Transport failure details.
        message: String,
    },

    /// The upstream API answered with a non-2xx status.
    #[error("Upstream rejected request with status {status}: {}", upstream_message(.body))]
    UpstreamRejected {
        /// Upstream status code.
        status: u16,
        /// Upstream body, verbatim.
        body: Value,
    },

    /// The order guard refused the order.
    #[error("Order blocked: {reason}")]
    GuardBlocked {
        /// Why the guard refused.
        reason: GuardBlockReason,
    },

    /// A 2xx body did not match the expected shape.
    #[error("Malformed upstream response: {message}")]
    MalformedUpstreamResponse {
        /// Decode failure details.
        message: String,
    },

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Caller input was rejected before any upstream call.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong.
        message: String,
    },

    /// Profile store failure.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// An upstream mutation succeeded but the local record was not updated.
    ///
    /// `upstream_id` is what the caller needs to repair the local record.
    #[error("{resource} {upstream_id} was created upstream but not recorded locally: {message}")]
    ReconciliationPending {
        /// Kind of upstream resource (account, watchlist).
        resource: &'static str,
        /// Identifier assigned upstream.
        upstream_id: String,
        /// Why the local write did not happen.
        message: String,
    },
}

impl OrchestrationError {
    /// Build an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// HTTP-style status classification.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotOnboarded | Self::InvalidInput { .. } => 400,
            Self::UpstreamTransport { .. } | Self::MalformedUpstreamResponse { .. } => 502,
            Self::UpstreamRejected { status, .. } => *status,
            Self::GuardBlocked { reason } => match reason {
                GuardBlockReason::CeilingReached { .. } => 422,
                GuardBlockReason::EvaluationFailed { .. } => 503,
            },
            Self::Cancelled => 499,
            Self::Profile(ProfileError::NotFound { .. }) => 404,
            Self::Profile(ProfileError::Storage { .. }) | Self::ReconciliationPending { .. } => 500,
        }
    }

    /// Stable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotOnboarded => "NOT_ONBOARDED",
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::GuardBlocked {
                reason: GuardBlockReason::CeilingReached { .. },
            } => "DAYTRADE_LIMIT_REACHED",
            Self::GuardBlocked {
                reason: GuardBlockReason::EvaluationFailed { .. },
            } => "GUARD_UNAVAILABLE",
            Self::UpstreamRejected { .. } => "UPSTREAM_REJECTED",
            Self::UpstreamTransport { .. } => "UPSTREAM_UNAVAILABLE",
            Self::MalformedUpstreamResponse { .. } => "MALFORMED_UPSTREAM_RESPONSE",
            Self::Cancelled => "CANCELLED",
            Self::Profile(ProfileError::NotFound { .. }) => "PROFILE_NOT_FOUND",
            Self::Profile(ProfileError::Storage { .. }) => "PROFILE_STORE_ERROR",
            Self::ReconciliationPending { .. } => "RECONCILIATION_PENDING",
        }
    }

    /// Whether the error blocks an order through the guard.
    #[must_use]
    pub const fn is_guard_block(&self) -> bool {
        matches!(self, Self::GuardBlocked { .. })
    }
}

impl From<GatewayError> for OrchestrationError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Cancelled => Self::Cancelled,
            GatewayError::Encode { message } => Self::InvalidInput { message },
            GatewayError::Transport { .. } | GatewayError::InvalidUrl { .. } => {
                Self::UpstreamTransport {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<DomainError> for OrchestrationError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput {
            message: err.to_string(),
        }
    }
}

/// Human-readable part of an upstream error body.
///
/// Brokerage errors look like `{"code": 40310000, "message": "..."}`.
fn upstream_message(body: &Value) -> String {
    match body {
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| body.to_string(), str::to_string),
        Value::String(text) => text.clone(),
        Value::Null => "empty body".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::UserId;
    use test_case::test_case;

    #[test_case(OrchestrationError::NotOnboarded, 400, "NOT_ONBOARDED")]
    #[test_case(OrchestrationError::invalid_input("empty symbol"), 400, "INVALID_INPUT")]
    #[test_case(OrchestrationError::Cancelled, 499, "CANCELLED")]
    #[test_case(
        OrchestrationError::UpstreamTransport { message: "refused".into() },
        502,
        "UPSTREAM_UNAVAILABLE"
    )]
    #[test_case(
        OrchestrationError::MalformedUpstreamResponse { message: "eof".into() },
        502,
        "MALFORMED_UPSTREAM_RESPONSE"
    )]
    #[test_case(
        OrchestrationError::UpstreamRejected { status: 403, body: Value::Null },
        403,
        "UPSTREAM_REJECTED"
    )]
    #[test_case(
        OrchestrationError::Profile(ProfileError::NotFound { user_id: UserId::new(1) }),
        404,
        "PROFILE_NOT_FOUND"
    )]
    #[test_case(
        OrchestrationError::ReconciliationPending {
            resource: "watchlist",
            upstream_id: "wl-1".into(),
            message: "disk full".into(),
        },
        500,
        "RECONCILIATION_PENDING"
    )]
    fn status_and_code(err: OrchestrationError, status: u16, code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.code(), code);
    }

    #[test]
    fn guard_block_statuses_differ_by_reason() {
        let ceiling = OrchestrationError::GuardBlocked {
            reason: GuardBlockReason::CeilingReached {
                daytrade_count: 3,
                ceiling: 3,
            },
        };
        let unavailable = OrchestrationError::GuardBlocked {
            reason: GuardBlockReason::EvaluationFailed {
                message: "timeout".into(),
            },
        };

        assert_eq!(ceiling.status_code(), 422);
        assert_eq!(unavailable.status_code(), 503);
        assert!(ceiling.is_guard_block() && unavailable.is_guard_block());
        assert!(ceiling.to_string().contains("limit of 3"));
    }

    #[test]
    fn rejected_message_prefers_upstream_message_field() {
        let err = OrchestrationError::UpstreamRejected {
            status: 422,
            body: serde_json::json!({"code": 40010001, "message": "qty must be > 0"}),
        };
        assert_eq!(
            err.to_string(),
            "Upstream rejected request with status 422: qty must be > 0"
        );
    }

    #[test]
    fn gateway_errors_map_upward() {
        assert_eq!(
            OrchestrationError::from(GatewayError::Cancelled),
            OrchestrationError::Cancelled
        );
        let err = OrchestrationError::from(GatewayError::Transport {
            message: "connection refused".into(),
        });
        assert_eq!(err.code(), "UPSTREAM_UNAVAILABLE");
        assert!(err.to_string().contains("connection refused"));
    }
}
