use serde::Deserialize;
use serde_json::Value;

use crate::document::DocumentStore;
use crate::domain::now_millis;
use crate::reports::{self, FeedQuery};
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "notification.feed";

#[derive(Default, Deserialize)]
#[serde(default)]
struct Input {
    page: Option<u64>,
    limit: Option<u64>,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.raw_input().is_object() || ctx.raw_input().is_null()
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let input = ctx.input::<Input>()?;
    let (page, limit) = ctx.paging(input.page, input.limit);
    let feed = reports::notification_feed(
        ctx.store(),
        &FeedQuery {
            user_id: user_id.to_string(),
            now: now_millis(),
            window_millis: ctx.config().notification_window_millis(),
            page,
            limit,
        },
    )?;
    Ok(serde_json::to_value(feed)?)
}
