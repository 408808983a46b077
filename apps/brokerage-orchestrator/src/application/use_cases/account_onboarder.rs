//! Account Onboarder
//!
//! Opens an upstream brokerage account from a local profile and records the
//! returned identifiers on the profile.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::application::error::OrchestrationError;
use crate::application::ports::{BrokerGatewayPort, ProfilePort};
use crate::application::routes;
use crate::application::use_cases::support::dispatch;
use crate::domain::onboarding::{AccountApplication, AccountReceipt, is_account_created};
use crate::domain::profile::UserProfile;

/// Source of the agreement signing time.
pub type Clock = fn() -> DateTime<Utc>;

/// Submits account applications and reconciles the result into the profile.
pub struct AccountOnboarder<G, P>
where
    G: BrokerGatewayPort,
    P: ProfilePort,
{
    gateway: Arc<G>,
    profiles: Arc<P>,
    clock: Clock,
}

impl<G, P> AccountOnboarder<G, P>
where
    G: BrokerGatewayPort,
    P: ProfilePort,
{
    /// Create a new AccountOnboarder using the system clock.
    pub fn new(gateway: Arc<G>, profiles: Arc<P>) -> Self {
        Self {
            gateway,
            profiles,
            clock: Utc::now,
        }
    }

    /// Replace the clock used to stamp agreements.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Submit an account application built from `profile`.
    ///
    /// A response containing `account_number` is a success: the account id,
    /// number, currency and status are written to the profile and the
    /// updated profile is returned. Anything else is `UpstreamRejected`
    /// with the upstream status and body, and the profile is left untouched.
    ///
    /// A profile that already has an account is rejected before any call.
    pub async fn onboard(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<UserProfile, OrchestrationError> {
        if let Some(existing) = profile.account().filter(|id| !id.as_str().trim().is_empty()) {
            return Err(OrchestrationError::invalid_input(format!(
                "profile already has brokerage account {existing}"
            )));
        }

        let application = AccountApplication::from_profile(profile, (self.clock)());
        let request = routes::accounts().post().with_body(&application)?;

        tracing::info!(user_id = %profile.id, "Submitting brokerage account application");
        let response = dispatch(self.gateway.as_ref(), request, cancel).await?;

        if !is_account_created(&response.body) {
            tracing::warn!(
                user_id = %profile.id,
                status = response.status,
                "Account application rejected"
            );
            return Err(OrchestrationError::UpstreamRejected {
                status: response.status,
                body: response.json_value(),
            });
        }

        let receipt: AccountReceipt = match response.json() {
            Ok(receipt) => receipt,
            Err(_) if !response.is_success() => {
                return Err(OrchestrationError::UpstreamRejected {
                    status: response.status,
                    body: response.json_value(),
                });
            }
            Err(e) => {
                return Err(OrchestrationError::MalformedUpstreamResponse {
                    message: e.to_string(),
                });
            }
        };

        match self.profiles.update(profile.id, receipt.to_patch()).await {
            Ok(updated) => {
                tracing::info!(
                    user_id = %profile.id,
                    account_id = %receipt.id,
                    status = %receipt.status,
                    "Brokerage account opened"
                );
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(
                    user_id = %profile.id,
                    account_id = %receipt.id,
                    error = %e,
                    "Account opened upstream but profile update failed"
                );
                Err(OrchestrationError::ReconciliationPending {
                    resource: "account",
                    upstream_id: receipt.id.into_inner(),
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::HttpMethod;
    use crate::application::ports::testing::{MemoryProfiles, ScriptedGateway};
    use crate::domain::shared::{AccountId, UserId};
    use chrono::TimeZone;
    use serde_json::json;

    const ACCOUNTS: &str = "/v1/accounts";

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(7),
            email: "jo@example.com".to_string(),
            mobile: "+15555550100".to_string(),
            address: "20 N San Mateo Dr".to_string(),
            city: "San Mateo".to_string(),
            state: "CA".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            tax_id: "666-55-4321".to_string(),
            tax_id_type: "USA_SSN".to_string(),
            funding_source: "employment_income".to_string(),
            ..UserProfile::default()
        }
    }

    fn onboarder(
        gateway: ScriptedGateway,
        profiles: MemoryProfiles,
    ) -> (
        AccountOnboarder<ScriptedGateway, MemoryProfiles>,
        Arc<ScriptedGateway>,
        Arc<MemoryProfiles>,
    ) {
        let gateway = Arc::new(gateway);
        let profiles = Arc::new(profiles);
        let onboarder = AccountOnboarder::new(Arc::clone(&gateway), Arc::clone(&profiles))
            .with_clock(fixed_clock);
        (onboarder, gateway, profiles)
    }

    #[tokio::test]
    async fn success_reconciles_four_fields() {
        let (onboarder, gateway, profiles) = onboarder(
            ScriptedGateway::new().on_json(
                HttpMethod::Post,
                ACCOUNTS,
                200,
                &json!({
                    "id": "acct-9",
                    "account_number": "987654321",
                    "status": "SUBMITTED",
                    "currency": "USD",
                    "last_equity": "0",
                    "created_at": "2024-03-01T12:00:01Z"
                }),
            ),
            MemoryProfiles::with(profile()),
        );

        let updated = onboarder
            .onboard(&profile(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(updated.account_id, Some(AccountId::new("acct-9")));
        assert_eq!(updated.account_number.as_deref(), Some("987654321"));
        assert_eq!(updated.account_currency.as_deref(), Some("USD"));
        assert_eq!(updated.account_status.as_deref(), Some("SUBMITTED"));
        assert_eq!(updated.email, "jo@example.com");
        assert_eq!(profiles.updates().len(), 1);

        let body = gateway.calls()[0].body.clone().unwrap();
        assert_eq!(body["agreements"][0]["signed_at"], "2024-03-01T12:00:00Z");
        assert_eq!(body["identity"]["funding_source"], json!(["employment_income"]));
        assert_eq!(body["contact"]["country"], "USA");
    }

    #[tokio::test]
    async fn missing_marker_leaves_profile_unchanged() {
        let (onboarder, _, profiles) = onboarder(
            ScriptedGateway::new().on_json(
                HttpMethod::Post,
                ACCOUNTS,
                422,
                &json!({"code": 40010000, "message": "identity.tax_id is invalid"}),
            ),
            MemoryProfiles::with(profile()),
        );

        let err = onboarder
            .onboard(&profile(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            OrchestrationError::UpstreamRejected { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body["message"], "identity.tax_id is invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(profiles.updates().is_empty());
        assert!(profiles.current(UserId::new(7)).unwrap().account_id.is_none());
    }

    #[tokio::test]
    async fn success_status_without_marker_is_still_rejected() {
        let (onboarder, _, profiles) = onboarder(
            ScriptedGateway::new().on(HttpMethod::Post, ACCOUNTS, 200, r#"{"id":"acct-9"}"#),
            MemoryProfiles::with(profile()),
        );

        let err = onboarder
            .onboard(&profile(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 200);
        assert!(profiles.updates().is_empty());
    }

    #[tokio::test]
    async fn profile_write_failure_is_reconciliation_pending() {
        let (onboarder, _, _) = onboarder(
            ScriptedGateway::new().on_json(
                HttpMethod::Post,
                ACCOUNTS,
                200,
                &json!({"id": "acct-9", "account_number": "1", "status": "SUBMITTED", "currency": "USD"}),
            ),
            MemoryProfiles::with(profile()).failing_updates(),
        );

        let err = onboarder
            .onboard(&profile(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "RECONCILIATION_PENDING");
        assert!(err.to_string().contains("acct-9"));
    }

    #[tokio::test]
    async fn already_onboarded_makes_no_call() {
        let (onboarder, gateway, _) = onboarder(ScriptedGateway::new(), MemoryProfiles::default());
        let onboarded = UserProfile {
            account_id: Some(AccountId::new("acct-1")),
            ..profile()
        };

        let err = onboarder
            .onboard(&onboarded, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(gateway.calls().is_empty());
    }
}
