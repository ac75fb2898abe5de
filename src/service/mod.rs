//! Service - the request/response boundary.
//!
//! Register command handlers on a `Service`. Each handler receives a
//! `Context<S>` with the input payload, the session variables, the
//! document store, the configuration and the refresh token store, and
//! every outcome is wrapped in a `ResponseEnvelope`.
//!
//! `compose` is the composition root: it wires a store and a config into a
//! service with every report command registered.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use orgdesk::{service, AdminConfig, InMemoryDocumentStore};
//! use serde_json::json;
//!
//! let service = Arc::new(service::compose(InMemoryDocumentStore::new(), AdminConfig::default()));
//!
//! // Direct dispatch
//! let feed = service.dispatch("notification.feed", json!({}), service::Session::for_user(user_id));
//!
//! // HTTP transport (requires "http" feature)
//! // service::serve(service, "0.0.0.0:3000").await?;
//! ```
//!
//! ## Handler Convention
//!
//! ```ignore
//! // src/handlers/notification_mark_seen.rs
//!
//! pub const COMMAND: &str = "notification.mark_seen";
//!
//! pub fn guard<S>(ctx: &Context<S>) -> bool {
//!     ctx.has_fields(&["notification"])
//! }
//!
//! pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
//!     let user_id = ctx.user_id()?;
//!     let input = ctx.input::<Input>()?;
//!     let marked = reports::mark_seen(ctx.store(), &input.notification, user_id)?;
//!     Ok(json!({ "marked": marked }))
//! }
//! ```

mod context;
mod envelope;
mod error;
#[allow(clippy::module_inception)]
mod service;
mod session;

pub use context::Context;
pub use envelope::ResponseEnvelope;
pub use error::HandlerError;
pub use service::{CommandRequest, Service};
pub use session::{Session, SESSION_KEYS, TENANT_ID, USER_ID, USER_ROLE};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

use crate::config::AdminConfig;
use crate::document::DocumentStore;
use crate::handlers;

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str` - the command name
/// - `guard(ctx) -> bool` - input validation
/// - `handle(ctx) -> Result<Value, HandlerError>` - the handler
///
/// # Example
/// ```ignore
/// let service = orgdesk::register_handlers!(
///     Service::new(InMemoryDocumentStore::new(), AdminConfig::default()),
///     handlers::ou_breadcrumbs,
///     handlers::notification_feed,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}

/// Register every report and auth command on `service`.
pub fn register_reports<S: DocumentStore + 'static>(service: Service<S>) -> Service<S> {
    register_handlers!(
        service,
        handlers::ou_breadcrumbs,
        handlers::announcement_results,
        handlers::assessment_excel_data,
        handlers::survey_excel_data,
        handlers::notification_feed,
        handlers::notification_mark_seen,
        handlers::training_catalog,
        handlers::search_advanced,
        handlers::auth_refresh,
        handlers::auth_logout,
    )
}

/// Composition root: a service over `store` with every command registered.
pub fn compose<S: DocumentStore + 'static>(store: S, config: AdminConfig) -> Service<S> {
    tracing::info!(
        folding = ?config.arabic_folding,
        window_hours = config.notification_window_hours,
        "composing admin service"
    );
    register_reports(Service::new(store, config))
}
