//! In-memory pipeline execution.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::{Accumulator, Pipeline, Projection, SortOrder, Stage};
use crate::value::{compare_values, lookup_path, remove_path, resolve_path, set_path, values_equal};

/// Read access to whole collections, used by joins and unions.
pub trait CollectionSource {
    /// Every document of the named collection. Unknown collections are empty.
    fn collection(&self, name: &str) -> Vec<Value>;
}

/// Run `pipeline` over `input`, resolving joins through `source`.
pub fn run(source: &dyn CollectionSource, input: Vec<Value>, pipeline: &Pipeline) -> Vec<Value> {
    let mut docs = input;
    for stage in pipeline.as_stages() {
        docs = apply(source, docs, stage);
    }
    docs
}

fn apply(source: &dyn CollectionSource, docs: Vec<Value>, stage: &Stage) -> Vec<Value> {
    match stage {
        Stage::Match(filter) => docs.into_iter().filter(|doc| filter.matches(doc)).collect(),
        Stage::Lookup {
            from,
            local_field,
            foreign_field,
            as_field,
        } => {
            let foreign = source.collection(from);
            docs.into_iter()
                .map(|mut doc| {
                    let joined = lookup(&doc, &foreign, local_field, foreign_field);
                    set_path(&mut doc, as_field, Value::Array(joined));
                    doc
                })
                .collect()
        }
        Stage::GraphLookup {
            from,
            start_with,
            connect_from_field,
            connect_to_field,
            as_field,
            depth_field,
            max_depth,
        } => {
            let foreign = source.collection(from);
            docs.into_iter()
                .map(|mut doc| {
                    let start = flatten(start_with.eval(&doc));
                    let found = traverse(
                        &foreign,
                        start,
                        connect_from_field,
                        connect_to_field,
                        depth_field.as_deref(),
                        *max_depth,
                    );
                    set_path(&mut doc, as_field, Value::Array(found));
                    doc
                })
                .collect()
        }
        Stage::Unwind {
            path,
            preserve_null_and_empty,
        } => {
            let mut out = Vec::with_capacity(docs.len());
            for doc in docs {
                match resolve_path(&doc, path) {
                    Value::Array(items) if !items.is_empty() => {
                        for item in items {
                            let mut copy = doc.clone();
                            set_path(&mut copy, path, item);
                            out.push(copy);
                        }
                    }
                    Value::Array(_) | Value::Null => {
                        if *preserve_null_and_empty {
                            let mut copy = doc;
                            remove_path(&mut copy, path);
                            out.push(copy);
                        }
                    }
                    _ => out.push(doc),
                }
            }
            out
        }
        Stage::AddFields(fields) => docs
            .into_iter()
            .map(|mut doc| {
                let values: Vec<Value> = fields.iter().map(|(_, expr)| expr.eval(&doc)).collect();
                for ((name, _), value) in fields.iter().zip(values) {
                    set_path(&mut doc, name, value);
                }
                doc
            })
            .collect(),
        Stage::Project(fields) => docs.into_iter().map(|doc| project(doc, fields)).collect(),
        Stage::Sort(keys) => {
            let mut docs = docs;
            docs.sort_by(|a, b| {
                for (key, order) in keys {
                    let ord = compare_values(&resolve_path(a, key), &resolve_path(b, key));
                    let ord = match order {
                        SortOrder::Asc => ord,
                        SortOrder::Desc => ord.reverse(),
                    };
                    if ord.is_ne() {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
            docs
        }
        Stage::Skip(n) => docs.into_iter().skip(*n as usize).collect(),
        Stage::Limit(n) => docs.into_iter().take(*n as usize).collect(),
        Stage::Group { id, accumulators } => group(docs, id, accumulators),
        Stage::Facet(branches) => {
            let mut out = Map::new();
            for (name, branch) in branches {
                out.insert(name.clone(), Value::Array(run(source, docs.clone(), branch)));
            }
            vec![Value::Object(out)]
        }
        Stage::Count(field) => {
            if docs.is_empty() {
                Vec::new()
            } else {
                let mut out = Map::new();
                out.insert(field.clone(), Value::from(docs.len() as u64));
                vec![Value::Object(out)]
            }
        }
        Stage::UnionWith {
            collection,
            pipeline,
        } => {
            let mut docs = docs;
            docs.extend(run(source, source.collection(collection), pipeline));
            docs
        }
        Stage::ReplaceRoot(expr) => docs
            .iter()
            .map(|doc| expr.eval(doc))
            .filter(Value::is_object)
            .collect(),
    }
}

fn lookup(doc: &Value, foreign: &[Value], local_field: &str, foreign_field: &str) -> Vec<Value> {
    let local: Vec<&Value> = lookup_path(doc, local_field);
    foreign
        .iter()
        .filter(|candidate| {
            let keys = lookup_path(candidate, foreign_field);
            if local.is_empty() {
                return keys.is_empty() || keys.iter().any(|k| k.is_null());
            }
            keys.iter()
                .any(|k| local.iter().any(|l| !l.is_array() && values_equal(k, l)))
        })
        .cloned()
        .collect()
}

fn flatten(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().filter(|v| !v.is_null()).collect(),
        other => vec![other],
    }
}

fn traverse(
    foreign: &[Value],
    start: Vec<Value>,
    connect_from_field: &str,
    connect_to_field: &str,
    depth_field: Option<&str>,
    max_depth: Option<u32>,
) -> Vec<Value> {
    let mut found = Vec::new();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut frontier = start;
    let mut depth: u32 = 0;

    while !frontier.is_empty() {
        if max_depth.is_some_and(|max| depth > max) {
            break;
        }
        let mut next = Vec::new();
        for (index, candidate) in foreign.iter().enumerate() {
            if visited.contains(&index) {
                continue;
            }
            let connects = lookup_path(candidate, connect_to_field)
                .iter()
                .any(|k| frontier.iter().any(|f| values_equal(k, f)));
            if !connects {
                continue;
            }
            visited.insert(index);
            next.extend(flatten(resolve_path(candidate, connect_from_field)));
            let mut hit = candidate.clone();
            if let Some(field) = depth_field {
                set_path(&mut hit, field, Value::from(depth));
            }
            found.push(hit);
        }
        frontier = next;
        depth += 1;
    }
    found
}

fn project(doc: Value, fields: &[(String, Projection)]) -> Value {
    let inclusion = fields
        .iter()
        .any(|(name, p)| !matches!(p, Projection::Exclude) && name != "_id")
        || fields
            .iter()
            .any(|(_, p)| matches!(p, Projection::Computed(_)));

    if !inclusion {
        let mut doc = doc;
        for (name, _) in fields {
            remove_path(&mut doc, name);
        }
        return doc;
    }

    let mut out = Value::Object(Map::new());
    let excludes_id = fields
        .iter()
        .any(|(name, p)| name == "_id" && matches!(p, Projection::Exclude));
    if !excludes_id {
        if let Some(id) = doc.get("_id") {
            set_path(&mut out, "_id", id.clone());
        }
    }
    for (name, projection) in fields {
        let value = match projection {
            Projection::Exclude => continue,
            Projection::Include => resolve_path(&doc, name),
            Projection::Computed(expr) => expr.eval(&doc),
        };
        if !value.is_null() || matches!(projection, Projection::Computed(_)) {
            set_path(&mut out, name, value);
        }
    }
    out
}

fn group(docs: Vec<Value>, id: &super::Expr, accumulators: &[(String, Accumulator)]) -> Vec<Value> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, (Value, Vec<Value>)> = HashMap::new();

    for doc in docs {
        let key = id.eval(&doc);
        let signature = key.to_string();
        match buckets.get_mut(&signature) {
            Some((_, members)) => members.push(doc),
            None => {
                order.push(signature.clone());
                buckets.insert(signature, (key, vec![doc]));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|signature| buckets.remove(&signature))
        .map(|(key, members)| {
            let mut out = Map::new();
            out.insert("_id".to_string(), key);
            for (name, acc) in accumulators {
                out.insert(name.clone(), accumulate(acc, &members));
            }
            Value::Object(out)
        })
        .collect()
}

fn accumulate(acc: &Accumulator, members: &[Value]) -> Value {
    match acc {
        Accumulator::Sum(expr) => {
            let total: f64 = members
                .iter()
                .filter_map(|doc| expr.eval(doc).as_f64())
                .sum();
            super::expr::to_number(total)
        }
        Accumulator::Avg(expr) => {
            let values: Vec<f64> = members
                .iter()
                .filter_map(|doc| expr.eval(doc).as_f64())
                .collect();
            if values.is_empty() {
                Value::Null
            } else {
                super::expr::to_number(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        Accumulator::First(expr) => members
            .first()
            .map(|doc| expr.eval(doc))
            .unwrap_or(Value::Null),
        Accumulator::Push(expr) => {
            Value::Array(members.iter().map(|doc| expr.eval(doc)).collect())
        }
        Accumulator::AddToSet(expr) => {
            let mut set: Vec<Value> = Vec::new();
            for value in members.iter().map(|doc| expr.eval(doc)) {
                if !set.iter().any(|existing| values_equal(existing, &value)) {
                    set.push(value);
                }
            }
            Value::Array(set)
        }
    }
}
