//! Shared stage builders: joins, OU breadcrumbs and pagination.
//!
//! Reports compose these instead of hand-writing the same lookup, graph
//! traversal and facet stages for every entity.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{Expr, Pipeline, SortOrder, Stage};

/// Collection holding the organizational hierarchy.
pub const OU_COLLECTION: &str = "organizational_units";

/// Replace the id stored at `local_field` with the referenced document
/// from `from`. Documents whose reference does not resolve keep going,
/// without the field.
pub fn join_one(from: &str, local_field: &str, as_field: &str) -> Vec<Stage> {
    vec![
        Stage::Lookup {
            from: from.to_string(),
            local_field: local_field.to_string(),
            foreign_field: "_id".to_string(),
            as_field: as_field.to_string(),
        },
        Stage::Unwind {
            path: as_field.to_string(),
            preserve_null_and_empty: true,
        },
    ]
}

/// Collect every document of `from` whose `foreign_field` equals the value
/// at `local_field` into the array `as_field`.
pub fn join_many(from: &str, local_field: &str, foreign_field: &str, as_field: &str) -> Vec<Stage> {
    vec![Stage::Lookup {
        from: from.to_string(),
        local_field: local_field.to_string(),
        foreign_field: foreign_field.to_string(),
        as_field: as_field.to_string(),
    }]
}

/// Resolve the ancestor chain of the OU id stored at `ou_field` into
/// `as_field`: an array of OU names, root first, ending with the OU itself.
pub fn breadcrumbs(ou_field: &str, as_field: &str) -> Vec<Stage> {
    vec![
        Stage::GraphLookup {
            from: OU_COLLECTION.to_string(),
            start_with: Expr::field(ou_field),
            connect_from_field: "parent".to_string(),
            connect_to_field: "_id".to_string(),
            as_field: as_field.to_string(),
            depth_field: Some("depth".to_string()),
            max_depth: None,
        },
        Stage::AddFields(vec![(
            as_field.to_string(),
            Expr::Pluck(
                Box::new(Expr::SortArray(
                    Box::new(Expr::field(as_field)),
                    "depth".to_string(),
                    SortOrder::Desc,
                )),
                "name".to_string(),
            ),
        )]),
    ]
}

/// One page of `limit` documents plus the total count. Pages start at 1;
/// a zero page or limit is treated as 1.
pub fn paginate(page: u64, limit: u64) -> Vec<Stage> {
    paginate_with(page, limit, Vec::new())
}

/// `paginate` with extra facet branches computed over the same unpaged
/// input, such as a count of unread items across all pages.
pub fn paginate_with(page: u64, limit: u64, extra: Vec<(String, Pipeline)>) -> Vec<Stage> {
    let (page, limit) = (page.max(1), limit.max(1));
    let mut branches = vec![
        (
            "data".to_string(),
            Pipeline::new()
                .stage(Stage::Skip((page - 1) * limit))
                .stage(Stage::Limit(limit)),
        ),
        (
            "total".to_string(),
            Pipeline::new().stage(Stage::Count("count".to_string())),
        ),
    ];
    branches.extend(extra);
    vec![Stage::Facet(branches)]
}

/// A decoded page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode the output of a pipeline ending in `paginate(page, limit)`.
    pub fn from_facet(output: Vec<Value>, page: u64, limit: u64) -> Result<Self, serde_json::Error> {
        let (page, limit) = (page.max(1), limit.max(1));
        let facet = output.into_iter().next().unwrap_or(Value::Null);
        let total = facet
            .get("total")
            .and_then(|t| t.get(0))
            .and_then(|t| t.get("count"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let items = match facet.get("data") {
            Some(data) => serde_json::from_value(data.clone())?,
            None => Vec::new(),
        };
        Ok(Self {
            items,
            total,
            page,
            limit,
            pages: total.div_ceil(limit),
        })
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.pages,
        }
    }
}
