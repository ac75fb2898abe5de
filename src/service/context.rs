//! Context passed to command handlers.
//!
//! Carries the parsed input, session variables and the collaborators the
//! service was composed with. Handlers access everything they need through
//! the context.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;
use crate::auth::RefreshTokenStore;
use crate::config::AdminConfig;
use crate::filter::RuleTranslator;

/// The context passed to every command handler.
///
/// Generic over `S`, the document store the service was composed with.
///
/// ## Example
///
/// ```ignore
/// pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
///     let user_id = ctx.user_id()?;
///     let input = ctx.input::<MarkSeenInput>()?;
///     let marked = reports::mark_seen(ctx.store(), &input.notification, user_id)?;
///     Ok(json!({ "marked": marked }))
/// }
/// ```
pub struct Context<'a, S> {
    command_name: String,
    input: Value,
    session: Session,
    store: &'a S,
    config: &'a AdminConfig,
    tokens: &'a RefreshTokenStore,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(
        command_name: String,
        input: Value,
        session: Session,
        store: &'a S,
        config: &'a AdminConfig,
        tokens: &'a RefreshTokenStore,
    ) -> Self {
        Self {
            command_name,
            input,
            session,
            store,
            config,
            tokens,
        }
    }

    /// Deserialize the input payload into a typed struct. A null payload
    /// decodes as an empty object.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        let input = match &self.input {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        };
        serde_json::from_value(input).map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the user ID from the session. Returns `Unauthorized` if not present.
    pub fn user_id(&self) -> Result<&str, HandlerError> {
        self.session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthorized("missing user ID in session".into()))
    }

    pub fn role(&self) -> Option<&str> {
        self.session.role()
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.session.tenant_id()
    }

    pub fn store(&self) -> &S {
        self.store
    }

    pub fn config(&self) -> &AdminConfig {
        self.config
    }

    pub fn tokens(&self) -> &RefreshTokenStore {
        self.tokens
    }

    pub fn translator(&self) -> RuleTranslator {
        self.config.translator()
    }

    /// Resolve requested paging against the configured defaults.
    pub fn paging(&self, page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
        (page.unwrap_or(1).max(1), self.config.page_limit(limit))
    }

    /// Check if the raw input contains a non-null field.
    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
