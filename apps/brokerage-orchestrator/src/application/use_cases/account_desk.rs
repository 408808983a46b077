//! Account Desk Use Case
//!
//! Read-mostly pass-through views of the upstream account: account detail,
//! portfolio history, open positions, market calendar and clock.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::dto::{CalendarQuery, PortfolioHistoryQuery, UpstreamReply};
use crate::application::error::OrchestrationError;
use crate::application::ports::BrokerGatewayPort;
use crate::application::routes;
use crate::application::use_cases::support::{
    decode, dispatch, parse_symbol, pass_through, require_account,
};
use crate::domain::account::AccountSnapshot;
use crate::domain::profile::UserProfile;

/// Account-level pass-through operations.
pub struct AccountDesk<G>
where
    G: BrokerGatewayPort,
{
    gateway: Arc<G>,
}

impl<G> AccountDesk<G>
where
    G: BrokerGatewayPort,
{
    /// Create a new AccountDesk.
    pub const fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Decoded account snapshot.
    pub async fn account_snapshot(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<AccountSnapshot, OrchestrationError> {
        let account_id = require_account(profile)?;
        let request = routes::account(account_id).get();
        decode(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Account detail, verbatim.
    pub async fn account_detail(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let request = routes::account(account_id).get();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Equity and P/L time series.
    pub async fn portfolio_history(
        &self,
        profile: &UserProfile,
        query: &PortfolioHistoryQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let request = query.apply(routes::portfolio_history(account_id).get());
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// One open position.
    pub async fn position(
        &self,
        profile: &UserProfile,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let symbol = parse_symbol(symbol)?;
        let request = routes::position(account_id, &symbol).get();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Liquidate every open position.
    pub async fn close_all_positions(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        tracing::info!(account_id = %account_id, "Closing all positions");
        let request = routes::positions(account_id).delete();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Liquidate one position.
    pub async fn close_position(
        &self,
        profile: &UserProfile,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let account_id = require_account(profile)?;
        let symbol = parse_symbol(symbol)?;
        tracing::info!(account_id = %account_id, symbol = %symbol, "Closing position");
        let request = routes::position(account_id, &symbol).delete();
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Trading days and session times. Needs no account.
    pub async fn calendar(
        &self,
        query: &CalendarQuery,
        cancel: &CancellationToken,
    ) -> Result<UpstreamReply, OrchestrationError> {
        let request = query.apply(routes::calendar().get());
        pass_through(dispatch(self.gateway.as_ref(), request, cancel).await?)
    }

    /// Market clock. Needs no account.
    pub async fn clock(&self, cancel: &CancellationToken) -> Result<UpstreamReply, OrchestrationError> {
        pass_through(dispatch(self.gateway.as_ref(), routes::clock().get(), cancel).await?)
    }
}
