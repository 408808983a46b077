//! Order Desk Use Case
//!
//! Guarded order placement plus the order pass-through operations.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::dto::{OrderListQuery, UpstreamReply};
use crate::application::error::OrchestrationError;
use crate::application::ports::BrokerGatewayPort;
use crate::application::routes;
use crate::application::use_cases::order_guard::OrderGuard;
use crate::application::use_cases::support::{dispatch, ensure_active, pass_through, require_account};
use crate::domain::profile::UserProfile;

/// Order placement and management for one profile's account.
pub struct OrderDesk<G>
where
    G: BrokerGatewayPort,
{
    gateway: Arc<G>,
    guard: OrderGuard<G>,
}

impl<G> OrderDesk<G>
where
    G: BrokerGatewayPort,
{
    /// Create a new OrderDesk.
    pub const fn new(gateway: Arc<G>, guard: OrderGuard<G>) -> Self {
        Self { gateway, guard }
    }

    /// Place an order after the day-trade guard passes.
    ///
    /// The order payload is forwarded as-is; the upstream validates it.
    ///
    /// # Errors
    ///
    /// `NotOnboarded` without an account, `GuardBlocked` when the guard
    /// refuses or cannot evaluate, `UpstreamRejected` for a non-2xx reply.
    pub async fn create_order(
        &self,
        profile: &UserProfile,
        order: serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;

        let snapshot = self.guard.authorize(account_id, cancel).await.into_result()?;
        ensure_active(cancel)?;

        tracing::info!(
            account_id = %account_id,
            daytrade_count = snapshot.daytrade_count,
            "Submitting order"
        );

        let response = dispatch(
            self.gateway.as_ref(),
            routes::orders(account_id).post().with_json(order),
            cancel,
        )
        .await?;

        if !response.is_success() {
            tracing::warn!(
                account_id = %account_id,
                status = response.status,
                "Order rejected upstream"
            );
        }
        pass_through(response)
    }

    /// List orders.
    ///
    /// # Errors
    ///
    /// `NotOnboarded`, transport failures, and `UpstreamRejected`.
    pub async fn list_orders(
        &self,
        profile: &UserProfile,
        query: &OrderListQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let request = query.apply(routes::orders(account_id).get());
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// `NotOnboarded`, `InvalidInput` for a blank id, transport failures,
    /// and `UpstreamRejected`.
    pub async fn get_order(
        &self,
        profile: &UserProfile,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let order_id = require_order_id(order_id)?;
        let request = routes::order(account_id, order_id).get();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Replace an open order.
    ///
    /// Not guarded; only new orders count against the day-trade ceiling.
    ///
    /// # Errors
    ///
    /// `NotOnboarded`, `InvalidInput` for a blank id, transport failures,
    /// and `UpstreamRejected`.
    pub async fn replace_order(
        &self,
        profile: &UserProfile,
        order_id: &str,
        changes: serde_json::Value,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let order_id = require_order_id(order_id)?;
        let request = routes::order(account_id, order_id).patch().with_json(changes);
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Cancel one order.
    ///
    /// # Errors
    ///
    /// `NotOnboarded`, `InvalidInput` for a blank id, transport failures,
    /// and `UpstreamRejected`.
    pub async fn cancel_order(
        &self,
        profile: &UserProfile,
        order_id: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let order_id = require_order_id(order_id)?;
        tracing::info!(account_id = %account_id, order_id, "Cancelling order");
        let request = routes::order(account_id, order_id).delete();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Cancel every open order.
    ///
    /// # Errors
    ///
    /// `NotOnboarded`, transport failures, and `UpstreamRejected`.
    pub async fn cancel_all_orders(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        tracing::info!(account_id = %account_id, "Cancelling all orders");
        let request = routes::orders(account_id).delete();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }
}

fn require_order_id(order_id: &str) -> Result<&str, OrchestrationError> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(OrchestrationError::invalid_input("order id must not be empty"));
    }
    Ok(order_id)
}
