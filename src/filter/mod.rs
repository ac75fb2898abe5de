//! Filters - document-store match expressions.
//!
//! A `Filter` is a typed match expression. It renders to the JSON match
//! document a document database understands and evaluates in memory against
//! `serde_json::Value` documents, so the same filter drives the in-memory
//! store and any external store.
//!
//! ## Example
//!
//! ```ignore
//! use orgdesk::filter::{Condition, Filter, TextPattern, ArabicFolding};
//!
//! let filter = Filter::field("type", Condition::eq("survey"));
//! assert_eq!(filter.to_document(), json!({ "type": "survey" }));
//! ```

mod folding;
mod pattern;
mod rules;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::value::{compare_same_kind, lookup_path, values_equal};

pub use folding::ArabicFolding;
pub use pattern::{PatternKind, TextPattern};
pub use rules::{FilterExtras, FilterRequest, Operator, Rule, RuleTranslator, Translation};

/// A match expression over documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document (`{}`).
    #[default]
    All,
    /// Implicit conjunction of per-path conditions (`{a: .., b: ..}`).
    Match(Vec<(String, Condition)>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    /// Matches when none of the children matches.
    Nor(Vec<Filter>),
}

/// A condition on the values found at one path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Exists(bool),
    Pattern(TextPattern),
    /// At least one array element matches the inner filter.
    ElemMatch(Box<Filter>),
}

impl Condition {
    pub fn eq(value: impl Into<Value>) -> Self {
        Condition::Eq(value.into())
    }

    pub fn elem_match(filter: Filter) -> Self {
        Condition::ElemMatch(Box::new(filter))
    }
}

impl Filter {
    /// A single-path filter.
    pub fn field(path: impl Into<String>, condition: Condition) -> Self {
        Filter::Match(vec![(path.into(), condition)])
    }

    /// Conjunction that collapses trivial cases.
    pub fn all_of(filters: Vec<Filter>) -> Self {
        let mut filters: Vec<Filter> = filters
            .into_iter()
            .filter(|f| !matches!(f, Filter::All))
            .collect();
        match filters.len() {
            0 => Filter::All,
            1 => filters.remove(0),
            _ => Filter::And(filters),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    /// Render as a JSON match document.
    pub fn to_document(&self) -> Value {
        match self {
            Filter::All => Value::Object(Map::new()),
            Filter::Match(conditions) => {
                let mut map = Map::new();
                for (path, condition) in conditions {
                    map.insert(path.clone(), condition.to_document());
                }
                Value::Object(map)
            }
            Filter::And(children) => json!({ "$and": render_all(children) }),
            Filter::Or(children) => json!({ "$or": render_all(children) }),
            Filter::Nor(children) => json!({ "$nor": render_all(children) }),
        }
    }

    /// Evaluate against a document.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Match(conditions) => conditions
                .iter()
                .all(|(path, condition)| condition.matches(&lookup_path(doc, path))),
            Filter::And(children) => children.iter().all(|child| child.matches(doc)),
            Filter::Or(children) => children.iter().any(|child| child.matches(doc)),
            Filter::Nor(children) => !children.iter().any(|child| child.matches(doc)),
        }
    }
}

fn render_all(children: &[Filter]) -> Vec<Value> {
    children.iter().map(Filter::to_document).collect()
}

impl Condition {
    pub fn to_document(&self) -> Value {
        match self {
            Condition::Eq(value) => value.clone(),
            Condition::Ne(value) => json!({ "$ne": value }),
            Condition::In(values) => json!({ "$in": values }),
            Condition::Nin(values) => json!({ "$nin": values }),
            Condition::Gt(value) => json!({ "$gt": value }),
            Condition::Gte(value) => json!({ "$gte": value }),
            Condition::Lt(value) => json!({ "$lt": value }),
            Condition::Lte(value) => json!({ "$lte": value }),
            Condition::Exists(flag) => json!({ "$exists": flag }),
            Condition::Pattern(pattern) => {
                json!({ "$regex": pattern.source(), "$options": pattern.options() })
            }
            Condition::ElemMatch(filter) => json!({ "$elemMatch": filter.to_document() }),
        }
    }

    /// Evaluate against every value found at the condition's path.
    fn matches(&self, found: &[&Value]) -> bool {
        match self {
            Condition::Eq(expected) => {
                if expected.is_null() {
                    return found.is_empty() || found.iter().any(|v| v.is_null());
                }
                found.iter().any(|v| values_equal(v, expected))
            }
            Condition::Ne(expected) => !Condition::Eq(expected.clone()).matches(found),
            Condition::In(options) => found
                .iter()
                .any(|v| options.iter().any(|o| values_equal(v, o)))
                || (found.is_empty() && options.iter().any(Value::is_null)),
            Condition::Nin(options) => !Condition::In(options.clone()).matches(found),
            Condition::Gt(bound) => any_ordered(found, bound, |o| o.is_gt()),
            Condition::Gte(bound) => any_ordered(found, bound, |o| o.is_ge()),
            Condition::Lt(bound) => any_ordered(found, bound, |o| o.is_lt()),
            Condition::Lte(bound) => any_ordered(found, bound, |o| o.is_le()),
            Condition::Exists(flag) => found.is_empty() != *flag,
            Condition::Pattern(pattern) => found
                .iter()
                .any(|v| v.as_str().map(|s| pattern.is_match(s)).unwrap_or(false)),
            Condition::ElemMatch(filter) => found.iter().any(|v| match v {
                Value::Array(items) => items.iter().any(|item| filter.matches(item)),
                _ => false,
            }),
        }
    }
}

fn any_ordered(
    found: &[&Value],
    bound: &Value,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> bool {
    found
        .iter()
        .any(|v| compare_same_kind(v, bound).map(&accept).unwrap_or(false))
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}
