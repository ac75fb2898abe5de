//! Command handlers, one module per command.
//!
//! Each module exports `COMMAND`, `guard(ctx) -> bool` and
//! `handle(ctx) -> Result<Value, HandlerError>` and is registered with
//! `register_handlers!` in `service::compose`.

use serde::Deserialize;

pub mod announcement_results;
pub mod assessment_excel_data;
pub mod auth_logout;
pub mod auth_refresh;
pub mod notification_feed;
pub mod notification_mark_seen;
pub mod ou_breadcrumbs;
pub mod search_advanced;
pub mod survey_excel_data;
pub mod training_catalog;

#[derive(Deserialize)]
struct QuizInput {
    quiz: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenInput {
    refresh_token: String,
}
