//! Pipelines - declarative aggregation stage lists.
//!
//! A `Pipeline` is an ordered list of `Stage`s. It renders to the stage
//! documents a document database executes and runs in memory through
//! `exec::run` for the in-memory store.
//!
//! ## Example
//!
//! ```ignore
//! use orgdesk::pipeline::{helpers, Pipeline, SortOrder};
//!
//! let pipeline = Pipeline::new()
//!     .match_filter(filter)
//!     .stages(helpers::join_one("users", "user", "user"))
//!     .stages(helpers::breadcrumbs("user.ou", "breadcrumbs"))
//!     .sort(vec![("createdAt".into(), SortOrder::Desc)])
//!     .stages(helpers::paginate(1, 10));
//! ```

mod exec;
mod expr;
pub mod helpers;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::filter::Filter;

pub use exec::{run, CollectionSource};
pub use expr::Expr;
pub use helpers::Page;

pub(crate) use expr::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_i32(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// A field of a `$project` stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Include,
    Exclude,
    Computed(Expr),
}

/// A `$group` accumulator.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    Sum(Expr),
    Avg(Expr),
    First(Expr),
    Push(Expr),
    AddToSet(Expr),
}

impl Accumulator {
    fn to_document(&self) -> Value {
        match self {
            Accumulator::Sum(e) => json!({ "$sum": e.to_document() }),
            Accumulator::Avg(e) => json!({ "$avg": e.to_document() }),
            Accumulator::First(e) => json!({ "$first": e.to_document() }),
            Accumulator::Push(e) => json!({ "$push": e.to_document() }),
            Accumulator::AddToSet(e) => json!({ "$addToSet": e.to_document() }),
        }
    }
}

/// One aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Equality join; `as_field` receives the array of matches.
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        as_field: String,
    },
    /// Recursive traversal: starting from `start_with`, follow
    /// `connect_from_field` values to documents whose `connect_to_field` equals them.
    GraphLookup {
        from: String,
        start_with: Expr,
        connect_from_field: String,
        connect_to_field: String,
        as_field: String,
        depth_field: Option<String>,
        max_depth: Option<u32>,
    },
    Unwind {
        path: String,
        preserve_null_and_empty: bool,
    },
    AddFields(Vec<(String, Expr)>),
    Project(Vec<(String, Projection)>),
    Sort(Vec<(String, SortOrder)>),
    Skip(u64),
    Limit(u64),
    Group {
        id: Expr,
        accumulators: Vec<(String, Accumulator)>,
    },
    Facet(Vec<(String, Pipeline)>),
    Count(String),
    UnionWith {
        collection: String,
        pipeline: Pipeline,
    },
    ReplaceRoot(Expr),
}

impl Stage {
    /// Render as a store stage document.
    pub fn to_document(&self) -> Value {
        match self {
            Stage::Match(filter) => json!({ "$match": filter.to_document() }),
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                as_field,
            } => json!({ "$lookup": {
                "from": from,
                "localField": local_field,
                "foreignField": foreign_field,
                "as": as_field,
            }}),
            Stage::GraphLookup {
                from,
                start_with,
                connect_from_field,
                connect_to_field,
                as_field,
                depth_field,
                max_depth,
            } => {
                let mut graph = Map::new();
                graph.insert("from".into(), json!(from));
                graph.insert("startWith".into(), start_with.to_document());
                graph.insert("connectFromField".into(), json!(connect_from_field));
                graph.insert("connectToField".into(), json!(connect_to_field));
                graph.insert("as".into(), json!(as_field));
                if let Some(depth) = depth_field {
                    graph.insert("depthField".into(), json!(depth));
                }
                if let Some(max) = max_depth {
                    graph.insert("maxDepth".into(), json!(max));
                }
                json!({ "$graphLookup": graph })
            }
            Stage::Unwind {
                path,
                preserve_null_and_empty,
            } => json!({ "$unwind": {
                "path": format!("${}", path),
                "preserveNullAndEmptyArrays": preserve_null_and_empty,
            }}),
            Stage::AddFields(fields) => {
                json!({ "$addFields": render_fields(fields.iter().map(|(k, e)| (k, e.to_document()))) })
            }
            Stage::Project(fields) => {
                let rendered = fields.iter().map(|(k, p)| {
                    let value = match p {
                        Projection::Include => json!(1),
                        Projection::Exclude => json!(0),
                        Projection::Computed(e) => e.to_document(),
                    };
                    (k, value)
                });
                json!({ "$project": render_fields(rendered) })
            }
            Stage::Sort(keys) => {
                json!({ "$sort": render_fields(keys.iter().map(|(k, o)| (k, json!(o.as_i32())))) })
            }
            Stage::Skip(n) => json!({ "$skip": n }),
            Stage::Limit(n) => json!({ "$limit": n }),
            Stage::Group { id, accumulators } => {
                let mut group = Map::new();
                group.insert("_id".into(), id.to_document());
                for (name, acc) in accumulators {
                    group.insert(name.clone(), acc.to_document());
                }
                json!({ "$group": group })
            }
            Stage::Facet(branches) => {
                json!({ "$facet": render_fields(branches.iter().map(|(k, p)| (k, Value::Array(p.to_documents())))) })
            }
            Stage::Count(field) => json!({ "$count": field }),
            Stage::UnionWith {
                collection,
                pipeline,
            } => json!({ "$unionWith": {
                "coll": collection,
                "pipeline": pipeline.to_documents(),
            }}),
            Stage::ReplaceRoot(expr) => json!({ "$replaceRoot": { "newRoot": expr.to_document() } }),
        }
    }
}

fn render_fields<'a>(fields: impl Iterator<Item = (&'a String, Value)>) -> Value {
    let mut map = Map::new();
    for (name, value) in fields {
        map.insert(name.clone(), value);
    }
    Value::Object(map)
}

/// An ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append several stages (typically from a helper).
    pub fn stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.stages.extend(stages);
        self
    }

    /// Append a `$match` unless the filter matches everything.
    pub fn match_filter(self, filter: Filter) -> Self {
        if filter.is_all() {
            self
        } else {
            self.stage(Stage::Match(filter))
        }
    }

    pub fn add_fields(self, fields: Vec<(String, Expr)>) -> Self {
        self.stage(Stage::AddFields(fields))
    }

    pub fn project(self, fields: Vec<(String, Projection)>) -> Self {
        self.stage(Stage::Project(fields))
    }

    pub fn sort(self, keys: Vec<(String, SortOrder)>) -> Self {
        self.stage(Stage::Sort(keys))
    }

    pub fn unwind(self, path: impl Into<String>, preserve_null_and_empty: bool) -> Self {
        self.stage(Stage::Unwind {
            path: path.into(),
            preserve_null_and_empty,
        })
    }

    pub fn as_stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render every stage.
    pub fn to_documents(&self) -> Vec<Value> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}

impl Serialize for Pipeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_documents().serialize(serializer)
    }
}
