//! Aggregation expressions.

use serde_json::{json, Map, Number, Value};

use super::SortOrder;
use crate::value::{compare_values, is_truthy, resolve_path, values_equal};

/// An aggregation expression evaluated against one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A dotted field path (`$a.b`).
    Field(String),
    Literal(Value),
    /// First operand that is neither null nor missing.
    IfNull(Vec<Expr>),
    Add(Vec<Expr>),
    Subtract(Box<Expr>, Box<Expr>),
    Multiply(Vec<Expr>),
    /// Division; a zero divisor yields null.
    Divide(Box<Expr>, Box<Expr>),
    Round(Box<Expr>, u32),
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
    Gt(Box<Expr>, Box<Expr>),
    Gte(Box<Expr>, Box<Expr>),
    Lt(Box<Expr>, Box<Expr>),
    Lte(Box<Expr>, Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Cond {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Whether the first operand is an element of the second (an array).
    In(Box<Expr>, Box<Expr>),
    /// Length of an array; missing arrays count as zero.
    Size(Box<Expr>),
    Concat(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Array(Vec<Expr>),
    /// Sort an array of documents by one of their fields.
    SortArray(Box<Expr>, String, SortOrder),
    /// Map an array of documents to one of their fields.
    Pluck(Box<Expr>, String),
}

impl Expr {
    pub fn field(path: impl Into<String>) -> Self {
        Expr::Field(path.into())
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn if_null(options: Vec<Expr>) -> Self {
        Expr::IfNull(options)
    }

    pub fn cond(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Cond {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Expr::Eq(Box::new(left), Box::new(right))
    }

    pub fn gte(left: Expr, right: Expr) -> Self {
        Expr::Gte(Box::new(left), Box::new(right))
    }

    pub fn is_in(needle: Expr, haystack: Expr) -> Self {
        Expr::In(Box::new(needle), Box::new(haystack))
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    pub fn size(inner: Expr) -> Self {
        Expr::Size(Box::new(inner))
    }

    /// Render as a store expression.
    pub fn to_document(&self) -> Value {
        match self {
            Expr::Field(path) => Value::String(format!("${}", path)),
            Expr::Literal(value) => match value {
                // Strings starting with `$` would read as field paths.
                Value::String(s) if s.starts_with('$') => json!({ "$literal": s }),
                other => other.clone(),
            },
            Expr::IfNull(options) => json!({ "$ifNull": render(options) }),
            Expr::Add(items) => json!({ "$add": render(items) }),
            Expr::Subtract(a, b) => json!({ "$subtract": [a.to_document(), b.to_document()] }),
            Expr::Multiply(items) => json!({ "$multiply": render(items) }),
            Expr::Divide(a, b) => json!({ "$divide": [a.to_document(), b.to_document()] }),
            Expr::Round(inner, places) => json!({ "$round": [inner.to_document(), places] }),
            Expr::Eq(a, b) => binary("$eq", a, b),
            Expr::Ne(a, b) => binary("$ne", a, b),
            Expr::Gt(a, b) => binary("$gt", a, b),
            Expr::Gte(a, b) => binary("$gte", a, b),
            Expr::Lt(a, b) => binary("$lt", a, b),
            Expr::Lte(a, b) => binary("$lte", a, b),
            Expr::And(items) => json!({ "$and": render(items) }),
            Expr::Or(items) => json!({ "$or": render(items) }),
            Expr::Not(inner) => json!({ "$not": [inner.to_document()] }),
            Expr::Cond {
                condition,
                then,
                otherwise,
            } => json!({ "$cond": {
                "if": condition.to_document(),
                "then": then.to_document(),
                "else": otherwise.to_document(),
            }}),
            Expr::In(a, b) => binary("$in", a, b),
            Expr::Size(inner) => json!({ "$size": { "$ifNull": [inner.to_document(), []] } }),
            Expr::Concat(items) => json!({ "$concat": render(items) }),
            Expr::Object(fields) => {
                let mut map = Map::new();
                for (name, expr) in fields {
                    map.insert(name.clone(), expr.to_document());
                }
                Value::Object(map)
            }
            Expr::Array(items) => Value::Array(render(items)),
            Expr::SortArray(input, field, order) => {
                let direction = match order {
                    SortOrder::Asc => 1,
                    SortOrder::Desc => -1,
                };
                let mut sort_by = Map::new();
                sort_by.insert(field.clone(), json!(direction));
                json!({ "$sortArray": { "input": input.to_document(), "sortBy": sort_by } })
            }
            Expr::Pluck(input, field) => json!({ "$map": {
                "input": input.to_document(),
                "as": "item",
                "in": format!("$$item.{}", field),
            }}),
        }
    }

    /// Evaluate against a document.
    pub fn eval(&self, doc: &Value) -> Value {
        match self {
            Expr::Field(path) => resolve_path(doc, path),
            Expr::Literal(value) => value.clone(),
            Expr::IfNull(options) => options
                .iter()
                .map(|option| option.eval(doc))
                .find(|value| !value.is_null())
                .unwrap_or(Value::Null),
            Expr::Add(items) => fold_numbers(items, doc, 0.0, |acc, n| acc + n),
            Expr::Multiply(items) => fold_numbers(items, doc, 1.0, |acc, n| acc * n),
            Expr::Subtract(a, b) => match (number(&a.eval(doc)), number(&b.eval(doc))) {
                (Some(a), Some(b)) => to_number(a - b),
                _ => Value::Null,
            },
            Expr::Divide(a, b) => match (number(&a.eval(doc)), number(&b.eval(doc))) {
                (Some(_), Some(b)) if b == 0.0 => Value::Null,
                (Some(a), Some(b)) => to_number(a / b),
                _ => Value::Null,
            },
            Expr::Round(inner, places) => match number(&inner.eval(doc)) {
                Some(n) => to_number(round_to(n, *places)),
                None => Value::Null,
            },
            Expr::Eq(a, b) => Value::Bool(values_equal(&a.eval(doc), &b.eval(doc))),
            Expr::Ne(a, b) => Value::Bool(!values_equal(&a.eval(doc), &b.eval(doc))),
            Expr::Gt(a, b) => Value::Bool(compare_values(&a.eval(doc), &b.eval(doc)).is_gt()),
            Expr::Gte(a, b) => Value::Bool(compare_values(&a.eval(doc), &b.eval(doc)).is_ge()),
            Expr::Lt(a, b) => Value::Bool(compare_values(&a.eval(doc), &b.eval(doc)).is_lt()),
            Expr::Lte(a, b) => Value::Bool(compare_values(&a.eval(doc), &b.eval(doc)).is_le()),
            Expr::And(items) => Value::Bool(items.iter().all(|item| is_truthy(&item.eval(doc)))),
            Expr::Or(items) => Value::Bool(items.iter().any(|item| is_truthy(&item.eval(doc)))),
            Expr::Not(inner) => Value::Bool(!is_truthy(&inner.eval(doc))),
            Expr::Cond {
                condition,
                then,
                otherwise,
            } => {
                if is_truthy(&condition.eval(doc)) {
                    then.eval(doc)
                } else {
                    otherwise.eval(doc)
                }
            }
            Expr::In(needle, haystack) => {
                let needle = needle.eval(doc);
                let found = match haystack.eval(doc) {
                    Value::Array(items) => items.iter().any(|item| values_equal(item, &needle)),
                    _ => false,
                };
                Value::Bool(found)
            }
            Expr::Size(inner) => match inner.eval(doc) {
                Value::Array(items) => Value::from(items.len() as u64),
                _ => Value::from(0u64),
            },
            Expr::Concat(items) => {
                let mut out = String::new();
                for item in items {
                    match item.eval(doc) {
                        Value::String(s) => out.push_str(&s),
                        Value::Null => return Value::Null,
                        other => out.push_str(&other.to_string()),
                    }
                }
                Value::String(out)
            }
            Expr::Object(fields) => {
                let mut map = Map::new();
                for (name, expr) in fields {
                    let value = expr.eval(doc);
                    if !value.is_null() {
                        map.insert(name.clone(), value);
                    }
                }
                Value::Object(map)
            }
            Expr::Array(items) => Value::Array(items.iter().map(|item| item.eval(doc)).collect()),
            Expr::SortArray(input, field, order) => match input.eval(doc) {
                Value::Array(mut items) => {
                    items.sort_by(|a, b| {
                        let ord = compare_values(&resolve_path(a, field), &resolve_path(b, field));
                        match order {
                            SortOrder::Asc => ord,
                            SortOrder::Desc => ord.reverse(),
                        }
                    });
                    Value::Array(items)
                }
                _ => Value::Null,
            },
            Expr::Pluck(input, field) => match input.eval(doc) {
                Value::Array(items) => {
                    Value::Array(items.iter().map(|item| resolve_path(item, field)).collect())
                }
                _ => Value::Null,
            },
        }
    }
}

fn render(items: &[Expr]) -> Vec<Value> {
    items.iter().map(Expr::to_document).collect()
}

fn binary(op: &str, a: &Expr, b: &Expr) -> Value {
    let mut map = Map::new();
    map.insert(op.to_string(), json!([a.to_document(), b.to_document()]));
    Value::Object(map)
}

fn fold_numbers(items: &[Expr], doc: &Value, init: f64, op: impl Fn(f64, f64) -> f64) -> Value {
    let mut acc = init;
    for item in items {
        match number(&item.eval(doc)) {
            Some(n) => acc = op(acc, n),
            None => return Value::Null,
        }
    }
    to_number(acc)
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Integral results stay integers so documents compare cleanly.
pub(crate) fn to_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

pub(crate) fn round_to(n: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (n * factor).round() / factor
}
