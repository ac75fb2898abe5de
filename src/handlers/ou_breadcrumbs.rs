use serde::Deserialize;
use serde_json::{json, Value};

use crate::document::DocumentStore;
use crate::reports;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "ou.breadcrumbs";

#[derive(Deserialize)]
struct Input {
    ou: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["ou"])
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let breadcrumbs = reports::ou_breadcrumbs(ctx.store(), &input.ou)?;
    Ok(json!({ "ou": input.ou, "breadcrumbs": breadcrumbs }))
}
