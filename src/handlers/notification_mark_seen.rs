use serde::Deserialize;
use serde_json::{json, Value};

use crate::document::DocumentStore;
use crate::reports;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "notification.mark_seen";

#[derive(Deserialize)]
struct Input {
    notification: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["notification"])
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let input = ctx.input::<Input>()?;
    let marked = reports::mark_seen(ctx.store(), &input.notification, user_id)?;
    Ok(json!({ "notification": input.notification, "marked": marked }))
}
