use serde_json::Value;

use crate::document::DocumentStore;
use crate::reports::{self, CatalogQuery};
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "training.catalog";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.raw_input().is_object() || ctx.raw_input().is_null()
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let mut query = ctx.input::<CatalogQuery>()?;
    if let Some(tenant) = ctx.tenant_id() {
        query.company = Some(tenant.to_string());
    }
    let (page, limit) = ctx.paging(query.page, query.limit);
    let catalog = reports::training_catalog(ctx.store(), &ctx.translator(), &query, page, limit)?;
    Ok(serde_json::to_value(catalog)?)
}
