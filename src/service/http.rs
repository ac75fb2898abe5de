//! HTTP transport - maps HTTP requests to command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /:command` - dispatch a command. Body = JSON input; the gateway
//!   headers (`x-user-id`, `x-user-role`, `x-tenant-id`) become the Session.
//!   The response body is always a `ResponseEnvelope`; its `statusCode` is
//!   also the HTTP status.
//! - `GET /health` - health check returning `{ "ok": true, "commands": [...] }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use orgdesk::{service, AdminConfig, InMemoryDocumentStore};
//!
//! let config = AdminConfig::from_env()?;
//! let addr = config.bind_addr.clone();
//! let service = Arc::new(service::compose(InMemoryDocumentStore::new(), config));
//!
//! service::serve(service, &addr).await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::envelope::ResponseEnvelope;
use super::service::Service;
use super::session::{Session, SESSION_KEYS};

/// Build an axum `Router` that dispatches commands via the given service.
pub fn router<S: Send + Sync + 'static>(service: Arc<Service<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/:command", post(command_handler))
        .with_state(service)
}

/// Serve the service over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "http transport listening");
    axum::serve(listener, app).await
}

async fn health_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "commands": service.commands() }))
}

async fn command_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(command): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> impl IntoResponse {
    let session = session_from_headers(&headers);
    let envelope = ResponseEnvelope::from_result(service.dispatch(&command, input, session));
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope))
}

/// Only the gateway's claim headers reach the session. Credentials and
/// other request headers stay in the transport.
fn session_from_headers(headers: &HeaderMap) -> Session {
    Session::from_pairs(SESSION_KEYS.into_iter().filter_map(|key| {
        let value = headers.get(key)?.to_str().ok()?;
        Some((key, value))
    }))
}
