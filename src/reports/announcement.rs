use serde::{Deserialize, Serialize};

use super::ReportError;
use crate::document::{validate_id, Document, DocumentStore};
use crate::domain::{Announcement, User};
use crate::filter::{Condition, Filter};
use crate::pipeline::{helpers, Expr, Pipeline, Projection, SortOrder};

/// One response to an announcement, flattened with the responder. Every
/// column is optional: responses written by older clients may lack any of
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResultRow {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub ou: Option<String>,
    #[serde(default)]
    pub breadcrumbs: Vec<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub responded_at: Option<i64>,
}

pub fn announcement_results_pipeline(announcement_id: &str) -> Pipeline {
    let computed = |name: &str, path: &str| (name.to_string(), Projection::Computed(Expr::field(path)));
    Pipeline::new()
        .match_filter(Filter::field("_id", Condition::eq(announcement_id)))
        .unwind("responses", false)
        .stages(helpers::join_one(User::COLLECTION, "responses.user", "user"))
        .stages(helpers::breadcrumbs("user.ou", "breadcrumbs"))
        .project(vec![
            ("_id".to_string(), Projection::Exclude),
            computed("user", "user.name"),
            computed("email", "user.email"),
            computed("ou", "user.ou"),
            ("breadcrumbs".to_string(), Projection::Include),
            computed("response", "responses.response"),
            computed("respondedAt", "responses.respondedAt"),
        ])
        .sort(vec![("respondedAt".to_string(), SortOrder::Desc)])
}

/// Responses to an announcement, newest first.
pub fn announcement_results<S: DocumentStore + ?Sized>(
    store: &S,
    announcement_id: &str,
) -> Result<Vec<AnnouncementResultRow>, ReportError> {
    validate_id(announcement_id)?;
    if store
        .get_document(Announcement::COLLECTION, announcement_id)?
        .is_none()
    {
        return Err(ReportError::not_found(Announcement::COLLECTION, announcement_id));
    }

    let rows = store.aggregate(
        Announcement::COLLECTION,
        &announcement_results_pipeline(announcement_id),
    )?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(ReportError::from))
        .collect()
}
