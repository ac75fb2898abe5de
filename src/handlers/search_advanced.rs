use serde_json::Value;

use crate::document::DocumentStore;
use crate::reports::{self, SearchQuery};
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "search.advanced";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.raw_input()
        .get("collection")
        .and_then(Value::as_str)
        .is_some_and(|c| !c.trim().is_empty())
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let mut query = ctx.input::<SearchQuery>()?;
    if let Some(tenant) = ctx.tenant_id() {
        query.company = Some(tenant.to_string());
    }
    let (page, limit) = ctx.paging(query.page, query.limit);
    let results = reports::advanced_search(ctx.store(), &ctx.translator(), &query, page, limit)?;
    Ok(serde_json::to_value(results)?)
}
