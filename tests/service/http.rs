//! HTTP transport integration tests.
//!
//! Starts an axum server over the composed service and exercises it with
//! reqwest.

use std::sync::Arc;

use orgdesk::service::{self, Service};
use orgdesk::{InMemoryDocumentStore, ResponseEnvelope};
use serde_json::json;

use crate::support::{seed, Fixture};

/// Bind to port 0 and return the actual address.
async fn start_server(service: Arc<Service<InMemoryDocumentStore>>) -> String {
    let app = service::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start() -> (String, Fixture) {
    let (service, fixture) = seed();
    (start_server(Arc::new(service)).await, fixture)
}

#[tokio::test]
async fn health_lists_commands() {
    let (base, _) = start().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["commands"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn command_returns_envelope() {
    let (base, ids) = start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/ou.breadcrumbs"))
        .json(&json!({ "ou": ids.branch.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let envelope: ResponseEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.data["breadcrumbs"], json!(["HQ", "Branch"]));
}

#[tokio::test]
async fn headers_become_the_session() {
    let (base, ids) = start().await;
    let client = reqwest::Client::new();

    let anonymous = client
        .post(format!("{base}/notification.feed"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), 401);
    let envelope: ResponseEnvelope = anonymous.json().await.unwrap();
    assert_eq!(envelope.status_code, 401);

    let resp = client
        .post(format!("{base}/notification.feed"))
        .header("X-User-Id", ids.user.id.as_str())
        .json(&json!({ "limit": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let envelope: ResponseEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.data["total"], 1);
    assert_eq!(envelope.data["limit"], 5);
    assert_eq!(envelope.data["items"][0]["_id"], ids.notification.id.as_str());
}

#[tokio::test]
async fn error_status_matches_envelope() {
    let (base, ids) = start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/survey.excel_data"))
        .json(&json!({ "quiz": ids.quiz.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let envelope: ResponseEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.status_code, 404);
    assert!(envelope.data.is_null());

    let resp = client
        .post(format!("{base}/unknown"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
