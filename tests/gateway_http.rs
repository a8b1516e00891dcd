//! End-to-end HTTP tests
//!
//! Real gateway on an ephemeral port, a fake KYC oracle served by axum, and
//! the in-memory account store. Asserts the status code and envelope mapping
//! for every route.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode as AxumStatus;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use kyc_ledger::gateway::{self, AppState};
use kyc_ledger::{HttpRiskGate, LedgerService, MemoryAccountStore};

async fn fake_score(
    State(hits): State<Arc<AtomicUsize>>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    let score = match q.get("owner").map(String::as_str) {
        Some("alice") => 720,
        Some("bob") => 650,
        Some("charlie") => 450,
        Some("threshold") => 500,
        _ => return AxumStatus::BAD_GATEWAY.into_response(),
    };
    Json(json!({ "score": score })).into_response()
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    oracle_hits: Arc<AtomicUsize>,
}

impl TestServer {
    async fn start() -> Self {
        let oracle_hits = Arc::new(AtomicUsize::new(0));
        let oracle = Router::new()
            .route("/v1/score", get(fake_score))
            .with_state(oracle_hits.clone());
        let oracle_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let oracle_addr = oracle_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(oracle_listener, oracle).await.unwrap();
        });

        let gate = HttpRiskGate::new(
            &format!("http://{}", oracle_addr),
            Duration::from_secs(2),
            500.0,
        )
        .unwrap();
        let store = MemoryAccountStore::new(Duration::from_secs(2));
        let ledger = Arc::new(LedgerService::new(Arc::new(store), Arc::new(gate)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            gateway::serve(listener, AppState::new(ledger, None), std::future::pending())
                .await
                .unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            oracle_hits,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn open(&self, owner: &str, initial: i64) -> i64 {
        let (status, body) = self
            .post("/accounts", json!({ "owner": owner, "initial": initial }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "open {owner}: {body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn balance(&self, id: i64) -> i64 {
        let (status, body) = self.get(&format!("/accounts/{}/balance", id)).await;
        assert_eq!(status, StatusCode::OK, "balance {id}: {body}");
        body["data"]["balance"].as_i64().unwrap()
    }

    async fn transfer(&self, from: i64, to: i64, amount: i64) -> (StatusCode, Value) {
        self.post(
            "/transfer",
            json!({ "fromId": from, "toId": to, "amount": amount }),
        )
        .await
    }
}

#[tokio::test]
async fn test_open_and_transfer() {
    let server = TestServer::start().await;
    let alice = server.open("alice", 1000).await;
    let bob = server.open("bob", 100).await;

    let (status, body) = server.transfer(alice, bob, 250).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert!(body.get("error").is_none());
    assert_eq!(body["data"], json!({ "ok": true }));

    assert_eq!(server.balance(alice).await, 750);
    assert_eq!(server.balance(bob).await, 350);
}

#[tokio::test]
async fn test_threshold_score_is_admitted() {
    let server = TestServer::start().await;
    let id = server.open("threshold", 0).await;
    assert_eq!(server.balance(id).await, 0);
}

#[tokio::test]
async fn test_insufficient_funds_is_conflict() {
    let server = TestServer::start().await;
    let a = server.open("alice", 10).await;
    let b = server.open("bob", 0).await;

    let (status, body) = server.transfer(a, b, 50).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_ne!(body["code"], 0);
    assert_eq!(body["error"], "insufficient_funds");
    assert!(body.get("data").is_none());

    assert_eq!(server.balance(a).await, 10);
    assert_eq!(server.balance(b).await, 0);
}

#[tokio::test]
async fn test_kyc_rejected_is_forbidden() {
    let server = TestServer::start().await;
    let (status, body) = server.post("/accounts", json!({ "owner": "charlie" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_ne!(body["code"], 0);
    assert_eq!(body["error"], "kyc_rejected");
}

#[tokio::test]
async fn test_oracle_failure_is_service_unavailable() {
    let server = TestServer::start().await;
    let (status, body) = server.post("/accounts", json!({ "owner": "nobody" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "gate_unavailable");
}

#[tokio::test]
async fn test_invalid_open_requests_skip_the_oracle() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/accounts", json!({ "owner": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");

    let (status, _) = server
        .post("/accounts", json!({ "owner": "alice", "initial": -5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(server.oracle_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_transfers_are_bad_request() {
    let server = TestServer::start().await;
    let a = server.open("alice", 100).await;
    let b = server.open("bob", 100).await;

    for amount in [0, -10] {
        let (status, body) = server.transfer(a, b, amount).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_amount");
    }

    let (status, body) = server.transfer(a, a, 10).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "same_account");

    assert_eq!(server.balance(a).await, 100);
    assert_eq!(server.balance(b).await, 100);
}

#[tokio::test]
async fn test_missing_accounts_are_not_found() {
    let server = TestServer::start().await;
    let a = server.open("alice", 100).await;

    let (status, body) = server.transfer(a, 9_999, 10).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "account_not_found");

    let (status, body) = server.get("/accounts/9999/balance").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "account_not_found");

    assert_eq!(server.balance(a).await, 100);
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/accounts/abc/balance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_ne!(body["code"], 0);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .post(format!("{}/transfer", server.base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/transfer", json!({ "fromId": "one", "toId": 2, "amount": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_and_openapi() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ok"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));

    let (status, doc) = server.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/transfer").is_some());
}
