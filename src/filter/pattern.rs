//! Case-insensitive text patterns built from user search terms.
//!
//! Each pattern carries two forms: the `source` string a document database
//! receives as `$regex`, and a compiled local matcher. Exclusion patterns are
//! rendered with a negative lookahead but matched locally by negating a plain
//! alternation, since the `regex` crate has no lookaround. Both forms are
//! case-insensitive and let `.` match newlines (`$options: "is"`), so
//! multi-line values behave the same in memory and in the store.

use std::fmt;

use regex::{Regex, RegexBuilder};

use super::folding::ArabicFolding;

/// The shape of a text pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// The whole value appears anywhere.
    Substring,
    /// None of the terms appears anywhere.
    Excludes,
    /// At least one term appears.
    AnyOf,
    /// Every term appears, in the given order.
    AllInOrder,
    /// Every term appears as a whole word, in the given order.
    WholeWords,
}

/// A compiled, case-insensitive text pattern.
#[derive(Clone)]
pub struct TextPattern {
    kind: PatternKind,
    source: String,
    matcher: Regex,
}

impl TextPattern {
    /// Pattern matching `value` as a substring. `None` when the value is blank.
    pub fn substring(value: &str, folding: ArabicFolding) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let source = folding.fold(&regex::escape(value));
        Self::compile(PatternKind::Substring, source.clone(), &source)
    }

    /// Pattern rejecting any text that contains one of the terms.
    pub fn excludes(value: &str, folding: ArabicFolding) -> Option<Self> {
        let alternation = prepare_terms(value, folding)?.join("|");
        let source = format!("^((?!({})).)*$", alternation);
        Self::compile(PatternKind::Excludes, source, &alternation)
    }

    /// Pattern accepting text that contains any one of the terms.
    pub fn any_of(value: &str, folding: ArabicFolding) -> Option<Self> {
        let source = prepare_terms(value, folding)?.join("|");
        Self::compile(PatternKind::AnyOf, source.clone(), &source)
    }

    /// Pattern accepting text that contains all terms in order.
    pub fn all_in_order(value: &str, folding: ArabicFolding) -> Option<Self> {
        let source = prepare_terms(value, folding)?.join(".*");
        Self::compile(PatternKind::AllInOrder, source.clone(), &source)
    }

    /// Pattern accepting text that contains all terms as whole words, in order.
    pub fn whole_words(value: &str, folding: ArabicFolding) -> Option<Self> {
        let source = prepare_terms(value, folding)?
            .iter()
            .map(|term| format!("\\b{}\\b", term))
            .collect::<Vec<_>>()
            .join(".*");
        Self::compile(PatternKind::WholeWords, source.clone(), &source)
    }

    fn compile(kind: PatternKind, source: String, positive: &str) -> Option<Self> {
        match RegexBuilder::new(positive)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
        {
            Ok(matcher) => Some(Self {
                kind,
                source,
                matcher,
            }),
            Err(err) => {
                tracing::warn!(pattern = %source, error = %err, "discarding uncompilable pattern");
                None
            }
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The pattern as sent to the document store.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Store options accompanying `source`: case-insensitive, dot matches
    /// newline, mirroring the local matcher.
    pub fn options(&self) -> &'static str {
        "is"
    }

    /// Whether `text` satisfies the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        match self.kind {
            PatternKind::Excludes => !self.matcher.is_match(text),
            _ => self.matcher.is_match(text),
        }
    }
}

impl fmt::Debug for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextPattern")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.source == other.source
    }
}

/// Split on whitespace, escape and fold. `None` when there are no terms.
fn prepare_terms(value: &str, folding: ArabicFolding) -> Option<Vec<String>> {
    let terms: Vec<String> = value
        .split_whitespace()
        .map(|term| folding.fold(&regex::escape(term)))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}
