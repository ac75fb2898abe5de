//! Service - command handler registry and dispatch.
//!
//! `Service<S>` owns the document store, the configuration and the refresh
//! token store, plus a set of named command handlers. Each handler receives
//! a `Context<S>` and returns `Result<Value, HandlerError>`.
//!
//! ## Example
//!
//! ```ignore
//! use orgdesk::service::{Service, Session};
//! use serde_json::json;
//!
//! let service = Service::new(InMemoryDocumentStore::new(), AdminConfig::default())
//!     .command("ping", |_ctx| Ok(json!({ "pong": true })));
//!
//! let result = service.dispatch("ping", json!({}), Session::new());
//! ```

use std::collections::HashMap;

use serde_json::Value;

use super::context::Context;
use super::envelope::ResponseEnvelope;
use super::error::HandlerError;
use super::session::Session;
use crate::auth::RefreshTokenStore;
use crate::config::AdminConfig;

type Guard<S> = Box<dyn Fn(&Context<S>) -> bool + Send + Sync>;
type Handle<S> = Box<dyn Fn(&Context<S>) -> Result<Value, HandlerError> + Send + Sync>;

struct CommandHandler<S> {
    guard: Option<Guard<S>>,
    handle: Handle<S>,
}

/// A service that routes commands to handler functions.
pub struct Service<S> {
    store: S,
    config: AdminConfig,
    tokens: RefreshTokenStore,
    handlers: HashMap<String, CommandHandler<S>>,
}

impl<S: Send + Sync + 'static> Service<S> {
    /// Create a service with a token store sized from `config`.
    pub fn new(store: S, config: AdminConfig) -> Self {
        let tokens = RefreshTokenStore::from_config(&config);
        Self::with_tokens(store, config, tokens)
    }

    pub fn with_tokens(store: S, config: AdminConfig, tokens: RefreshTokenStore) -> Self {
        Self {
            store,
            config,
            tokens,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler with a guard function.
    ///
    /// The guard runs before the handler. If it returns `false`, the
    /// command is rejected with `HandlerError::GuardRejected`.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<S>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<S>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command by name.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(
            command.to_string(),
            input,
            session,
            &self.store,
            &self.config,
            &self.tokens,
        );

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                tracing::warn!(command, "guard rejected command");
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        let result = (handler.handle)(&ctx);
        match &result {
            Ok(_) => tracing::info!(command, "command handled"),
            Err(e) if e.status_code() >= 500 => {
                tracing::error!(command, error = %e, "command failed")
            }
            Err(e) => tracing::warn!(command, error = %e, "command rejected"),
        }
        result
    }

    /// Dispatch a `CommandRequest`, wrapping the outcome in an envelope.
    pub fn dispatch_request(&self, request: &CommandRequest) -> ResponseEnvelope {
        let session = Session::from_map(request.session_variables.clone());
        ResponseEnvelope::from_result(self.dispatch(&request.command, request.input.clone(), session))
    }

    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn tokens(&self) -> &RefreshTokenStore {
        &self.tokens
    }
}

/// An inbound command request.
///
/// ```json
/// {
///   "command": "notification.feed",
///   "input": { "page": 1 },
///   "session_variables": { "x-user-id": "65a1b2c3d4e5f60718293a4b" }
/// }
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub session_variables: HashMap<String, String>,
}
