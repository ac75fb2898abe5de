use serde_json::{json, Value};

use super::TokenInput;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "auth.refresh";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["refreshToken"])
}

pub fn handle<S>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<TokenInput>()?;
    let (user, token) = ctx
        .tokens()
        .rotate(&input.refresh_token)
        .ok_or_else(|| HandlerError::Unauthorized("refresh token is not valid".into()))?;
    Ok(json!({ "user": user, "refreshToken": token }))
}
