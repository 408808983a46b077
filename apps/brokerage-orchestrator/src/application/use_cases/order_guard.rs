//! Order Guard
//!
//! Checks the account's day-trade counter before an order is forwarded.
//! The guard is fail-closed: if the counter cannot be read and decoded, the
//! order is blocked.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::error::{GuardBlockReason, OrchestrationError};
use crate::application::ports::BrokerGatewayPort;
use crate::application::routes;
use crate::application::use_cases::support::{decode, dispatch, require_account_id};
use crate::domain::account::{AccountSnapshot, DaytradePolicy};
use crate::domain::shared::AccountId;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// Whether the order may proceed.
    pub ok: bool,
    /// The snapshot the decision was based on, when one was fetched.
    pub snapshot: Option<AccountSnapshot>,
    /// Why the order was blocked, when `ok` is false.
    pub block_reason: Option<GuardBlockReason>,
}

impl Authorization {
    fn allowed(snapshot: AccountSnapshot) -> Self {
        Self {
            ok: true,
            snapshot: Some(snapshot),
            block_reason: None,
        }
    }

    fn blocked(snapshot: Option<AccountSnapshot>, reason: GuardBlockReason) -> Self {
        Self {
            ok: false,
            snapshot,
            block_reason: Some(reason),
        }
    }

    /// The snapshot if allowed, `GuardBlocked` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `GuardBlocked` with the block reason when `ok` is false.
    pub fn into_result(self) -> Result<AccountSnapshot, OrchestrationError> {
        match (self.ok, self.snapshot, self.block_reason) {
            (true, Some(snapshot), _) => Ok(snapshot),
            (_, _, Some(reason)) => Err(OrchestrationError::GuardBlocked { reason }),
            _ => Err(OrchestrationError::GuardBlocked {
                reason: GuardBlockReason::EvaluationFailed {
                    message: "no snapshot".to_string(),
                },
            }),
        }
    }
}

/// Day-trade guard for order placement.
pub struct OrderGuard<G>
where
    G: BrokerGatewayPort,
{
    gateway: Arc<G>,
    policy: DaytradePolicy,
}

impl<G> OrderGuard<G>
where
    G: BrokerGatewayPort,
{
    /// Create a new OrderGuard.
    pub const fn new(gateway: Arc<G>, policy: DaytradePolicy) -> Self {
        Self { gateway, policy }
    }

    /// The active policy.
    pub const fn policy(&self) -> DaytradePolicy {
        self.policy
    }

    /// Fetch a fresh account snapshot and decide whether an order may proceed.
    ///
    /// Never returns an error: every failure to evaluate becomes a blocked
    /// authorization with `GuardBlockReason::EvaluationFailed`.
    pub async fn authorize(&self, account_id: &AccountId, cancel: &CancellationToken) -> Authorization {
        let snapshot = match self.fetch_snapshot(account_id, cancel).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    account_id = %account_id,
                    error = %e,
                    "Order guard could not evaluate account; blocking"
                );
                return Authorization::blocked(
                    None,
                    GuardBlockReason::EvaluationFailed {
                        message: e.to_string(),
                    },
                );
            }
        };

        if self.policy.allows(&snapshot) {
            tracing::debug!(
                account_id = %account_id,
                daytrade_count = snapshot.daytrade_count,
                remaining = self.policy.remaining(&snapshot),
                "Order guard passed"
            );
            Authorization::allowed(snapshot)
        } else {
            tracing::info!(
                account_id = %account_id,
                daytrade_count = snapshot.daytrade_count,
                ceiling = self.policy.ceiling(),
                "Order blocked by day-trade ceiling"
            );
            let reason = GuardBlockReason::CeilingReached {
                daytrade_count: snapshot.daytrade_count,
                ceiling: self.policy.ceiling(),
            };
            Authorization::blocked(Some(snapshot), reason)
        }
    }

    async fn fetch_snapshot(
        &self,
        account_id: &AccountId,
        cancel: &CancellationToken,
    ) -> Result<AccountSnapshot, OrchestrationError> {
        require_account_id(account_id)?;
        let response = dispatch(
            self.gateway.as_ref(),
            routes::account(account_id).get(),
            cancel,
        )
        .await?;
        decode(response)
    }
}
