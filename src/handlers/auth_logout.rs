use serde_json::{json, Value};

use super::TokenInput;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "auth.logout";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["refreshToken"])
}

pub fn handle<S>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<TokenInput>()?;
    let revoked = ctx.tokens().revoke(&input.refresh_token);
    Ok(json!({ "revoked": revoked }))
}
