//! Rule-to-filter translation.
//!
//! Turns the structured search request (field/operator/value rules plus
//! free-text extras) into a match expression and the list of raw pattern
//! sources used later for highlighting.

use serde::{Deserialize, Serialize};

use super::folding::ArabicFolding;
use super::pattern::TextPattern;
use super::{Condition, Filter};

/// Operator of a single field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "equal")]
    Equal,
    #[serde(rename = "not contains")]
    NotContains,
    #[serde(rename = "contains any")]
    ContainsAny,
    #[serde(rename = "contains all")]
    ContainsAll,
}

/// A rule against one labelled entry of a document's `fields` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Option<String>,
}

impl Rule {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
        }
    }
}

/// Free-text modifiers and scoping values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExtras {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_all: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_any: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
}

/// The search request accepted by the translator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub extras: FilterExtras,
}

/// Result of translating a `FilterRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub filter: Filter,
    /// Raw pattern sources in clause order.
    pub patterns: Vec<String>,
}

/// Paths searched by the free-text modifiers.
const FREE_TEXT_PATHS: [&str; 3] = ["name", "fields.label", "fields.data"];

/// Translates search requests into filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTranslator {
    folding: ArabicFolding,
}

impl RuleTranslator {
    pub fn new(folding: ArabicFolding) -> Self {
        Self { folding }
    }

    pub fn folding(&self) -> ArabicFolding {
        self.folding
    }

    pub fn translate(&self, request: &FilterRequest) -> Translation {
        let mut clauses = Vec::new();
        let mut patterns = Vec::new();

        for rule in &request.rules {
            let Some(value) = non_blank(rule.value.as_deref()) else {
                continue;
            };
            let pattern = match rule.operator {
                Operator::Equal => TextPattern::substring(value, self.folding),
                Operator::NotContains => TextPattern::excludes(value, self.folding),
                Operator::ContainsAny => TextPattern::any_of(value, self.folding),
                Operator::ContainsAll => TextPattern::all_in_order(value, self.folding),
            };
            let Some(pattern) = pattern else {
                continue;
            };
            patterns.push(pattern.source().to_string());
            clauses.push(field_rule_clause(&rule.field, pattern));
        }

        let extras = &request.extras;
        let modifiers: [(Option<&str>, fn(&str, ArabicFolding) -> Option<TextPattern>); 4] = [
            (extras.like_all.as_deref(), TextPattern::all_in_order),
            (extras.like_any.as_deref(), TextPattern::any_of),
            (extras.not_contains.as_deref(), TextPattern::excludes),
            (extras.same_word.as_deref(), TextPattern::whole_words),
        ];
        for (value, build) in modifiers {
            let Some(pattern) = non_blank(value).and_then(|v| build(v, self.folding)) else {
                continue;
            };
            patterns.push(pattern.source().to_string());
            clauses.push(free_text_clause(&pattern));
        }

        if let Some(ou) = non_blank(extras.ou.as_deref()) {
            clauses.push(Filter::field("ou", Condition::eq(ou)));
        }

        let type_clause =
            non_blank(extras.kind.as_deref()).map(|kind| Filter::field("type", Condition::eq(kind)));

        let filter = match (clauses.is_empty(), type_clause) {
            (true, None) => Filter::All,
            (true, Some(type_only)) => type_only,
            (false, type_clause) => {
                clauses.extend(type_clause);
                Filter::And(clauses)
            }
        };

        tracing::debug!(
            rules = request.rules.len(),
            patterns = patterns.len(),
            "translated filter request"
        );

        Translation { filter, patterns }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn field_rule_clause(field: &str, pattern: TextPattern) -> Filter {
    Filter::field(
        "fields",
        Condition::elem_match(Filter::Match(vec![
            ("label".to_string(), Condition::eq(field)),
            ("data".to_string(), Condition::Pattern(pattern)),
        ])),
    )
}

fn free_text_clause(pattern: &TextPattern) -> Filter {
    Filter::Or(
        FREE_TEXT_PATHS
            .iter()
            .map(|path| Filter::field(*path, Condition::Pattern(pattern.clone())))
            .collect(),
    )
}
