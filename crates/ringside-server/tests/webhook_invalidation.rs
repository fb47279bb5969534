//! Webhook endpoint behavior: credential check, validation, invalidation
//! dispatch and forward-compatible no-ops.

use std::sync::Arc;

use async_trait::async_trait;
use ringside_core::Customer;
use ringside_psa::{CustomerSearch, PsaError};
use ringside_server::{AppConfig, AppState, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// The webhook path never consults the PSA; any call here is a bug.
struct UnreachablePsa;

#[async_trait]
impl CustomerSearch for UnreachablePsa {
    async fn search_customer_by_phone(&self, _phone: &str) -> Result<Option<Customer>, PsaError> {
        panic!("webhook handling must not touch the PSA client");
    }
}

fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.webhook.shared_secret = "hunter2".to_string();
    cfg
}

fn seeded_state() -> AppState {
    let state = AppState::new(&test_config(), Arc::new(UnreachablePsa));
    let jane = Customer {
        id: "42".to_string(),
        name: "Jane".to_string(),
        email: None,
        company: None,
        status: Default::default(),
        priority: Default::default(),
    };
    let bob = Customer {
        id: "7".to_string(),
        name: "Bob".to_string(),
        email: None,
        company: None,
        status: Default::default(),
        priority: Default::default(),
    };
    state.cache.put_positive("+14155552671", &jane, 3600);
    state.cache.put_positive("+61412345678", &jane, 3600);
    state.cache.put_positive("+15105550000", &bob, 3600);
    state
}

async fn start_server(
    state: AppState,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

#[tokio::test]
async fn customer_updated_purges_matching_rows() {
    let state = seeded_state();
    let cache = Arc::clone(&state.cache);
    let (base, shutdown_tx, handle) = start_server(state).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .header("x-webhook-secret", "hunter2")
        .json(&json!({ "event_type": "customer.updated", "customer_id": "42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["received"], true);
    assert_eq!(body["event_type"], "customer.updated");
    assert_eq!(body["invalidated"], 2);

    assert!(cache.get("+14155552671").is_none());
    assert!(cache.get("+61412345678").is_none());
    assert!(cache.get("+15105550000").is_some());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn zero_matches_still_succeeds() {
    let (base, shutdown_tx, handle) = start_server(seeded_state()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .header("x-webhook-secret", "hunter2")
        .json(&json!({ "event_type": "customer.updated", "customer_id": "9999" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["invalidated"], 0);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn wrong_credential_is_401_with_no_mutation() {
    let state = seeded_state();
    let cache = Arc::clone(&state.cache);
    let (base, shutdown_tx, handle) = start_server(state).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .header("x-webhook-secret", "wrong")
        .json(&json!({ "event_type": "customer.updated", "customer_id": "42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
    assert_eq!(cache.len(), 3);

    // Missing header entirely.
    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .json(&json!({ "event_type": "customer.updated", "customer_id": "42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(cache.len(), 3);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn malformed_payload_is_400() {
    let (base, shutdown_tx, handle) = start_server(seeded_state()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .header("x-webhook-secret", "hunter2")
        .json(&json!({ "event_type": "customer.updated" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .header("x-webhook-secret", "hunter2")
        .json(&json!({ "customer_id": "42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn unknown_event_type_is_acknowledged() {
    let state = seeded_state();
    let cache = Arc::clone(&state.cache);
    let (base, shutdown_tx, handle) = start_server(state).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/webhooks/psa"))
        .header("x-webhook-secret", "hunter2")
        .json(&json!({ "event_type": "ticket.created", "customer_id": "42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["received"], true);
    assert_eq!(body["event_type"], "ticket.created");
    assert_eq!(body["invalidated"], 0);
    assert_eq!(cache.len(), 3);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
