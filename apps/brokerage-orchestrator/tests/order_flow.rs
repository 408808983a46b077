//! Order placement through the day-trade guard against a local HTTP server.

#![allow(clippy::unwrap_used)]

mod common;

use brokerage_orchestrator::{InMemoryProfileStore, OrchestrationError, UserProfile};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TOKEN, account_body, container, onboarded};

const ACCOUNT_PATH: &str = "/v1/trading/accounts/acct-1/account";
const ORDERS_PATH: &str = "/v1/trading/accounts/acct-1/orders";

fn market_order() -> serde_json::Value {
    json!({"symbol": "AAPL", "qty": "1", "side": "buy", "type": "market", "time_in_force": "day"})
}

async fn mount_account(server: &MockServer, daytrade_count: u32) {
    Mock::given(method("GET"))
        .and(path(ACCOUNT_PATH))
        .and(header("Authorization", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body(daytrade_count)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn order_forwarded_below_ceiling() {
    let server = MockServer::start().await;
    mount_account(&server, 2).await;
    Mock::given(method("POST"))
        .and(path(ORDERS_PATH))
        .and(body_json(market_order()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ord-1", "status": "accepted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let desk = container(&server, InMemoryProfileStore::new()).order_desk();
    let reply = desk
        .create_order(&onboarded(1), market_order(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["id"], "ord-1");
}

#[tokio::test]
async fn order_blocked_at_ceiling_never_reaches_upstream() {
    let server = MockServer::start().await;
    mount_account(&server, 3).await;
    Mock::given(method("POST"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let desk = container(&server, InMemoryProfileStore::new()).order_desk();
    let err = desk
        .create_order(&onboarded(1), market_order(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_guard_block());
    assert_eq!(err.code(), "DAYTRADE_LIMIT_REACHED");
    assert_eq!(err.status_code(), 422);
}

#[tokio::test]
async fn unreadable_account_fails_closed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ACCOUNT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ORDERS_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let desk = container(&server, InMemoryProfileStore::new()).order_desk();
    let err = desk
        .create_order(&onboarded(1), market_order(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "GUARD_UNAVAILABLE");
}

#[tokio::test]
async fn upstream_order_rejection_is_passed_through() {
    let server = MockServer::start().await;
    mount_account(&server, 0).await;
    Mock::given(method("POST"))
        .and(path(ORDERS_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"code": 40310000, "message": "insufficient buying power"})),
        )
        .mount(&server)
        .await;

    let desk = container(&server, InMemoryProfileStore::new()).order_desk();
    let err = desk
        .create_order(&onboarded(1), market_order(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        OrchestrationError::UpstreamRejected { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body["message"], "insufficient buying power");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn profile_without_account_makes_no_calls() {
    let server = MockServer::start().await;

    let desk = container(&server, InMemoryProfileStore::new()).order_desk();
    let err = desk
        .create_order(&UserProfile::default(), market_order(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err, OrchestrationError::NotOnboarded);
    assert!(server.received_requests().await.unwrap().is_empty());
}
