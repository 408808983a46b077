//! Helpers shared by the use cases.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::application::dto::UpstreamReply;
use crate::application::error::OrchestrationError;
use crate::application::ports::{BrokerGatewayPort, GatewayRequest, UpstreamResponse};
use crate::domain::profile::UserProfile;
use crate::domain::shared::{AccountId, Symbol};

/// The profile's upstream account, or `NotOnboarded`.
pub(crate) fn require_account(profile: &UserProfile) -> Result<&AccountId, OrchestrationError> {
    profile
        .account()
        .filter(|id| !id.as_str().trim().is_empty())
        .ok_or(OrchestrationError::NotOnboarded)
}

/// Reject a blank account identifier before any upstream call.
pub(crate) fn require_account_id(account_id: &AccountId) -> Result<(), OrchestrationError> {
    if account_id.as_str().trim().is_empty() {
        return Err(OrchestrationError::NotOnboarded);
    }
    Ok(())
}

/// Parse a caller-supplied symbol.
pub(crate) fn parse_symbol(raw: &str) -> Result<Symbol, OrchestrationError> {
    if raw.trim().is_empty() {
        return Err(OrchestrationError::invalid_input("symbol must not be empty"));
    }
    Ok(Symbol::parse(raw)?)
}

/// `Cancelled` once the caller's token has fired.
pub(crate) fn ensure_active(cancel: &CancellationToken) -> Result<(), OrchestrationError> {
    if cancel.is_cancelled() {
        return Err(OrchestrationError::Cancelled);
    }
    Ok(())
}

/// Send after checking for cancellation.
pub(crate) async fn dispatch<G: BrokerGatewayPort + ?Sized>(
    gateway: &G,
    request: GatewayRequest,
    cancel: &CancellationToken,
) -> Result<UpstreamResponse, OrchestrationError> {
    ensure_active(cancel)?;
    Ok(gateway.send(request, cancel).await?)
}

/// Turn a non-2xx response into `UpstreamRejected`.
pub(crate) fn expect_success(
    response: UpstreamResponse,
) -> Result<UpstreamResponse, OrchestrationError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(OrchestrationError::UpstreamRejected {
            status: response.status,
            body: response.json_value(),
        })
    }
}

/// Decode a 2xx body as `T`.
pub(crate) fn decode<T: DeserializeOwned>(
    response: UpstreamResponse,
) -> Result<T, OrchestrationError> {
    let response = expect_success(response)?;
    response
        .json()
        .map_err(|e| OrchestrationError::MalformedUpstreamResponse {
            message: e.to_string(),
        })
}

/// Pass a 2xx reply through verbatim.
pub(crate) fn pass_through(response: UpstreamResponse) -> Result<UpstreamReply, OrchestrationError> {
    let response = expect_success(response)?;
    Ok(UpstreamReply::from(&response))
}
