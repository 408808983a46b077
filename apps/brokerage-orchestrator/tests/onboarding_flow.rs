//! Account onboarding against a local HTTP server.

#![allow(clippy::unwrap_used)]

mod common;

use brokerage_orchestrator::{
    AccountId, InMemoryProfileStore, OrchestrationError, ProfilePort, UserId, UserProfile,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::container;

fn applicant() -> UserProfile {
    UserProfile {
        id: UserId::new(42),
        email: "sam@example.com".to_string(),
        mobile: "+15555550123".to_string(),
        address: "1 Market St".to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        first_name: "Sam".to_string(),
        last_name: "Lee".to_string(),
        date_of_birth: "1988-05-17".to_string(),
        tax_id: "666-12-3456".to_string(),
        tax_id_type: "USA_SSN".to_string(),
        funding_source: "employment_income, savings".to_string(),
        ..UserProfile::default()
    }
}

#[tokio::test]
async fn onboarding_records_account_on_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acct-42",
            "account_number": "555000111",
            "status": "SUBMITTED",
            "currency": "USD",
            "last_equity": "0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let container = container(&server, InMemoryProfileStore::with_profile(applicant()));
    let updated = container
        .account_onboarder()
        .onboard(&applicant(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(updated.account_id, Some(AccountId::new("acct-42")));
    assert_eq!(updated.account_status.as_deref(), Some("SUBMITTED"));
    assert_eq!(
        container.profiles().get(UserId::new(42)).await.unwrap(),
        updated
    );

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["identity"]["funding_source"],
        json!(["employment_income", "savings"])
    );
    assert_eq!(body["contact"]["email_address"], "sam@example.com");
}

#[tokio::test]
async fn rejected_application_leaves_profile_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": 40910000,
            "message": "email address already exists"
        })))
        .mount(&server)
        .await;

    let container = container(&server, InMemoryProfileStore::with_profile(applicant()));
    let err = container
        .account_onboarder()
        .onboard(&applicant(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestrationError::UpstreamRejected { status: 409, .. }
    ));
    let stored = container.profiles().get(UserId::new(42)).await.unwrap();
    assert!(stored.account_id.is_none());
}

#[tokio::test]
async fn missing_local_profile_is_reconciliation_pending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "acct-42",
            "account_number": "555000111",
            "status": "SUBMITTED",
            "currency": "USD"
        })))
        .mount(&server)
        .await;

    let err = container(&server, InMemoryProfileStore::new())
        .account_onboarder()
        .onboard(&applicant(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        OrchestrationError::ReconciliationPending {
            resource,
            upstream_id,
            ..
        } => {
            assert_eq!(resource, "account");
            assert_eq!(upstream_id, "acct-42");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
