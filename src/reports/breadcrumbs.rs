use serde_json::Value;

use super::ReportError;
use crate::document::{validate_id, DocumentStore};
use crate::filter::{Condition, Filter};
use crate::pipeline::helpers::{self, OU_COLLECTION};
use crate::pipeline::{Pipeline, Projection};

pub fn ou_breadcrumbs_pipeline(ou_id: &str) -> Pipeline {
    Pipeline::new()
        .match_filter(Filter::field("_id", Condition::eq(ou_id)))
        .stages(helpers::breadcrumbs("_id", "breadcrumbs"))
        .project(vec![("breadcrumbs".to_string(), Projection::Include)])
}

/// Names of the OU's ancestors, root first, ending with the OU itself.
pub fn ou_breadcrumbs<S: DocumentStore + ?Sized>(
    store: &S,
    ou_id: &str,
) -> Result<Vec<String>, ReportError> {
    validate_id(ou_id)?;
    let output = store.aggregate(OU_COLLECTION, &ou_breadcrumbs_pipeline(ou_id))?;
    let unit = output
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::not_found(OU_COLLECTION, ou_id))?;
    Ok(unit
        .get("breadcrumbs")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(|name| name.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}
