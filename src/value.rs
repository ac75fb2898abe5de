//! Helpers for walking and comparing JSON document values.
//!
//! Documents are plain `serde_json::Value` objects. Dotted paths descend into
//! nested objects and fan out across arrays the way a document database does.

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// Collect every value reachable by a dotted path.
///
/// Arrays met along the way are traversed element by element, so
/// `fields.label` on `{ fields: [{label: "a"}, {label: "b"}] }` yields both
/// labels. A terminal array is yielded once as a whole and once per element,
/// which lets `{tags: "x"}` match `{tags: ["x", "y"]}`.
pub fn lookup_path<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            descend(value, segment, &mut next);
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }

    let mut out = Vec::with_capacity(current.len());
    for value in current {
        out.push(value);
        if let Value::Array(items) = value {
            out.extend(items.iter());
        }
    }
    out
}

fn descend<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(segment) {
                out.push(child);
            }
        }
        Value::Array(items) => {
            if let Ok(index) = segment.parse::<usize>() {
                if let Some(child) = items.get(index) {
                    out.push(child);
                }
                return;
            }
            for item in items {
                if let Value::Object(map) = item {
                    if let Some(child) = map.get(segment) {
                        out.push(child);
                    }
                }
            }
        }
        _ => {}
    }
}

/// Resolve a dotted path the way an aggregation expression does.
///
/// Missing paths resolve to `Value::Null`. Crossing an array maps the rest of
/// the path over its elements and returns an array.
pub fn resolve_path(doc: &Value, path: &str) -> Value {
    let mut segments = path.splitn(2, '.');
    let head = segments.next().unwrap_or_default();
    let rest = segments.next();

    let child = match doc {
        Value::Object(map) => match map.get(head) {
            Some(child) => child,
            None => return Value::Null,
        },
        Value::Array(items) => {
            let mapped: Vec<Value> = items
                .iter()
                .filter(|item| item.is_object())
                .map(|item| resolve_path(item, path))
                .filter(|value| !value.is_null())
                .collect();
            return Value::Array(mapped);
        }
        _ => return Value::Null,
    };

    match rest {
        None => child.clone(),
        Some(rest) => resolve_path(child, rest),
    }
}

/// Set a dotted path on an object, creating intermediate objects.
pub fn set_path(doc: &mut Value, path: &str, value: Value) {
    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    let mut current = doc;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        let entry = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = entry;
    }
}

/// Remove a dotted path from an object. Returns the removed value.
pub fn remove_path(doc: &mut Value, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => doc.as_object_mut()?.remove(path),
        Some((head, rest)) => remove_path(doc.as_object_mut()?.get_mut(head)?, rest),
    }
}

/// Equality with numeric coercion (`1` equals `1.0`).
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => left == right,
    }
}

/// Total order used for sorting and range comparisons.
///
/// Values of different kinds order by kind: null < number < string < object
/// < array < bool, the same bracket ordering a document database applies.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    let (lk, rk) = (kind_rank(left), kind_rank(right));
    if lk != rk {
        return lk.cmp(&rk);
    }
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                let ord = compare_values(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.len().cmp(&b.len())
        }
        _ => Ordering::Equal,
    }
}

/// Range comparison that only succeeds between values of the same kind.
pub fn compare_same_kind(left: &Value, right: &Value) -> Option<Ordering> {
    if kind_rank(left) != kind_rank(right) || left.is_null() {
        return None;
    }
    Some(compare_values(left, right))
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Truthiness as used by `$cond` and boolean operators.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => true,
    }
}
