use serde_json::Value;

use super::QuizInput;
use crate::document::DocumentStore;
use crate::domain::QuizKind;
use crate::reports;
use crate::service::{Context, HandlerError};

pub const COMMAND: &str = "assessment.excel_data";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_fields(&["quiz"])
}

pub fn handle<S: DocumentStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<QuizInput>()?;
    let data = reports::excel_data(ctx.store(), &input.quiz, QuizKind::Assessment)?;
    Ok(serde_json::to_value(data)?)
}
