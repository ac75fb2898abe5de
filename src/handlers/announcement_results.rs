use serde::Deserialize;
use serde_json::Value;

use crate::document::DocumentStore;
use crate::reports;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "announcement.results";

#[derive(Deserialize)]
struct Input {
    announcement: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["announcement"])
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let rows = reports::announcement_results(ctx.store(), &input.announcement)?;
    Ok(serde_json::to_value(rows)?)
}
