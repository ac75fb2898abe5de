//! Notification feed and read tracking.
//!
//! A user sees notifications addressed to them, to their OU or any of its
//! ancestors, and broadcasts. A notification is new while the user has not
//! seen it and it is younger than the visibility window.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ReportError;
use crate::document::{validate_id, Document, DocumentStore, DocumentsExt};
use crate::domain::{Notification, User};
use crate::filter::{Condition, Filter};
use crate::pipeline::helpers::{self, OU_COLLECTION};
use crate::pipeline::{Expr, Page, Pipeline, Projection, SortOrder, Stage};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub user_id: String,
    /// Evaluation time in epoch milliseconds.
    pub now: i64,
    pub window_millis: i64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default)]
    pub broadcast: bool,
    pub seen: bool,
    pub is_new: bool,
    /// Zero when the stored notification has no timestamp.
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationFeed {
    #[serde(flatten)]
    pub page: Page<FeedItem>,
    /// Unseen notifications across all pages.
    pub unseen: u64,
}

/// Ids of the user's OU and all of its ancestors.
pub fn user_ou_chain<S: DocumentStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<String>, ReportError> {
    let pipeline = Pipeline::new()
        .match_filter(Filter::field("_id", Condition::eq(user_id)))
        .stage(Stage::GraphLookup {
            from: OU_COLLECTION.to_string(),
            start_with: Expr::field("ou"),
            connect_from_field: "parent".to_string(),
            connect_to_field: "_id".to_string(),
            as_field: "chain".to_string(),
            depth_field: None,
            max_depth: None,
        })
        .project(vec![(
            "chain".to_string(),
            Projection::Computed(Expr::Pluck(Box::new(Expr::field("chain")), "_id".to_string())),
        )]);

    let user = store
        .aggregate(User::COLLECTION, &pipeline)?
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::not_found(User::COLLECTION, user_id))?;
    Ok(user
        .get("chain")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(|id| id.as_str().map(str::to_string)).collect())
        .unwrap_or_default())
}

pub fn feed_pipeline(query: &FeedQuery, ou_chain: &[String]) -> Pipeline {
    let recipients = Filter::Or(vec![
        Filter::field("user", Condition::eq(query.user_id.as_str())),
        Filter::field(
            "ou",
            Condition::In(ou_chain.iter().map(|id| Value::from(id.as_str())).collect()),
        ),
        Filter::field("broadcast", Condition::eq(true)),
    ]);
    let since = query.now.saturating_sub(query.window_millis);

    Pipeline::new()
        .match_filter(recipients)
        .add_fields(vec![(
            "seen".to_string(),
            Expr::is_in(
                Expr::lit(query.user_id.as_str()),
                Expr::if_null(vec![Expr::field("seenBy"), Expr::lit(Value::Array(Vec::new()))]),
            ),
        )])
        .add_fields(vec![(
            "isNew".to_string(),
            Expr::And(vec![
                Expr::not(Expr::field("seen")),
                Expr::gte(Expr::field("createdAt"), Expr::lit(since)),
            ]),
        )])
        .project(vec![("seenBy".to_string(), Projection::Exclude)])
        .sort(vec![
            ("createdAt".to_string(), SortOrder::Desc),
            ("_id".to_string(), SortOrder::Desc),
        ])
        .stages(helpers::paginate_with(
            query.page,
            query.limit,
            vec![(
                "unseen".to_string(),
                Pipeline::new()
                    .match_filter(Filter::field("seen", Condition::eq(false)))
                    .stage(Stage::Count("count".to_string())),
            )],
        ))
}

pub fn notification_feed<S: DocumentStore + ?Sized>(
    store: &S,
    query: &FeedQuery,
) -> Result<NotificationFeed, ReportError> {
    validate_id(&query.user_id)?;
    let chain = user_ou_chain(store, &query.user_id)?;
    let output = store.aggregate(Notification::COLLECTION, &feed_pipeline(query, &chain))?;

    let unseen = output
        .first()
        .and_then(|facet| facet.get("unseen"))
        .and_then(|u| u.get(0))
        .and_then(|u| u.get("count"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let page = Page::from_facet(output, query.page, query.limit)?;

    tracing::debug!(
        user = %query.user_id,
        total = page.total,
        unseen,
        "built notification feed"
    );
    Ok(NotificationFeed { page, unseen })
}

/// Record that `user_id` has seen a notification. Returns false when it
/// was already marked.
pub fn mark_seen<S: DocumentStore + ?Sized>(
    store: &S,
    notification_id: &str,
    user_id: &str,
) -> Result<bool, ReportError> {
    validate_id(notification_id)?;
    let notifications = store.documents::<Notification>();
    let mut notification = notifications
        .get(notification_id)?
        .ok_or_else(|| ReportError::not_found(Notification::COLLECTION, notification_id))?;

    if notification.seen_by.iter().any(|seen| seen == user_id) {
        return Ok(false);
    }
    notification.seen_by.push(user_id.to_string());

    let mut fields = Map::new();
    fields.insert("seenBy".to_string(), serde_json::to_value(&notification.seen_by)?);
    if !notifications.replace_fields(notification_id, fields)? {
        return Err(ReportError::not_found(Notification::COLLECTION, notification_id));
    }
    tracing::debug!(notification = %notification_id, user = %user_id, "marked seen");
    Ok(true)
}
