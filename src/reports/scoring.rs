//! Attempt export and scoring for assessments and surveys.
//!
//! The pipeline shapes one row per attempt: the user, the user's OU
//! breadcrumbs and every answer joined with its question. The submitted
//! value is taken from the first non-null of `value`, `field.value`,
//! `field.data.value` and `ordered`. Scoring then runs over the typed rows.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ReportError;
use crate::document::{validate_id, Document, DocumentStore, DocumentsExt, FindOptions};
use crate::domain::{Attempt, Question, QuestionType, Quiz, QuizKind, User};
use crate::filter::{Condition, Filter};
use crate::pipeline::{helpers, round_to, Accumulator, Expr, Pipeline, SortOrder, Stage};
use crate::value::values_equal;

/// Points of a question that does not set any.
const DEFAULT_POINTS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelData {
    pub quiz: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: QuizKind,
    pub questions: Vec<ExcelQuestion>,
    pub rows: Vec<ExcelRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcelQuestion {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcelRow {
    pub attempt: String,
    pub user: Option<String>,
    pub email: Option<String>,
    pub breadcrumbs: Vec<String>,
    pub submitted_at: Option<i64>,
    pub answers: Vec<ExcelAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcelAnswer {
    pub question: String,
    pub submitted: Value,
    /// Fraction of the question's points earned; absent for surveys and
    /// questions without a correct answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub earned: f64,
    pub possible: f64,
    pub percentage: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShapedAttempt {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    user: Option<ShapedUser>,
    #[serde(default)]
    breadcrumbs: Vec<String>,
    #[serde(default)]
    submitted_at: Option<i64>,
    #[serde(default)]
    answers: Vec<ShapedAnswer>,
}

#[derive(Debug, Deserialize)]
struct ShapedUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShapedAnswer {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    submitted: Option<Value>,
}

/// The submitted value, by precedence.
fn submitted_value() -> Expr {
    Expr::if_null(vec![
        Expr::field("answers.value"),
        Expr::field("answers.field.value"),
        Expr::field("answers.field.data.value"),
        Expr::field("answers.ordered"),
    ])
}

pub fn excel_data_pipeline(quiz_id: &str) -> Pipeline {
    Pipeline::new()
        .match_filter(Filter::field("quiz", Condition::eq(quiz_id)))
        .stages(helpers::join_one(User::COLLECTION, "user", "user"))
        .stages(helpers::breadcrumbs("user.ou", "breadcrumbs"))
        .unwind("answers", true)
        .add_fields(vec![("answers.submitted".to_string(), submitted_value())])
        .stages(helpers::join_one(
            Question::COLLECTION,
            "answers.question",
            "answers.question",
        ))
        .stage(Stage::Group {
            id: Expr::field("_id"),
            accumulators: vec![
                ("user".to_string(), Accumulator::First(Expr::field("user"))),
                (
                    "breadcrumbs".to_string(),
                    Accumulator::First(Expr::field("breadcrumbs")),
                ),
                (
                    "submittedAt".to_string(),
                    Accumulator::First(Expr::field("submittedAt")),
                ),
                (
                    "answers".to_string(),
                    Accumulator::Push(Expr::Object(vec![
                        ("question".to_string(), Expr::field("answers.question._id")),
                        ("submitted".to_string(), Expr::field("answers.submitted")),
                    ])),
                ),
            ],
        })
        .sort(vec![
            ("submittedAt".to_string(), SortOrder::Asc),
            ("_id".to_string(), SortOrder::Asc),
        ])
}

/// Export the attempts of a quiz of the given kind. Assessments are
/// scored; survey answers are reported as submitted.
pub fn excel_data<S: DocumentStore + ?Sized>(
    store: &S,
    quiz_id: &str,
    kind: QuizKind,
) -> Result<ExcelData, ReportError> {
    validate_id(quiz_id)?;
    let quiz = store
        .documents::<Quiz>()
        .get(quiz_id)?
        .filter(|quiz| quiz.kind == kind)
        .ok_or_else(|| ReportError::not_found(Quiz::COLLECTION, quiz_id))?;

    let questions = store.documents::<Question>().find(
        &Filter::field("quiz", Condition::eq(quiz_id)),
        &FindOptions::default()
            .sorted("order", SortOrder::Asc)
            .sorted("_id", SortOrder::Asc),
    )?;
    let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let scored = quiz.kind == QuizKind::Assessment;
    let possible: f64 = questions
        .iter()
        .filter(|q| q.answer.is_some())
        .map(points)
        .sum();

    let shaped = store.aggregate(Attempt::COLLECTION, &excel_data_pipeline(quiz_id))?;
    let mut rows = Vec::with_capacity(shaped.len());
    for value in shaped {
        let attempt: ShapedAttempt = serde_json::from_value(value)?;
        let mut answers = Vec::new();
        let mut answered = HashSet::new();
        for answer in attempt.answers {
            let Some(question) = answer.question.as_deref().and_then(|id| by_id.get(id)) else {
                continue;
            };
            // First submission per question counts.
            if !answered.insert(question.id.as_str()) {
                continue;
            }
            let submitted = answer.submitted.unwrap_or(Value::Null);
            let credit = match (&question.answer, scored) {
                (Some(correct), true) => Some(credit(question.kind, &submitted, correct)),
                _ => None,
            };
            answers.push(ExcelAnswer {
                question: question.id.clone(),
                submitted,
                credit,
                earned: credit.map(|c| round_to(c * points(question), 2)),
            });
        }
        let score = scored.then(|| {
            let earned: f64 = answers.iter().filter_map(|a| a.earned).sum();
            let percentage = if possible > 0.0 {
                round_to(earned / possible * 100.0, 2)
            } else {
                0.0
            };
            Score {
                earned: round_to(earned, 2),
                possible,
                percentage,
            }
        });
        let (user, email) = match attempt.user {
            Some(user) => (user.name, user.email),
            None => (None, None),
        };
        rows.push(ExcelRow {
            attempt: attempt.id,
            user,
            email,
            breadcrumbs: attempt.breadcrumbs,
            submitted_at: attempt.submitted_at,
            answers,
            score,
        });
    }

    tracing::debug!(quiz = %quiz.id, rows = rows.len(), scored, "built excel data");

    Ok(ExcelData {
        quiz: quiz.id,
        name: quiz.name,
        kind: quiz.kind,
        questions: questions
            .iter()
            .map(|q| ExcelQuestion {
                id: q.id.clone(),
                text: q.text.clone(),
                kind: q.kind,
                points: points(q),
            })
            .collect(),
        rows,
    })
}

fn points(question: &Question) -> f64 {
    question.points.unwrap_or(DEFAULT_POINTS)
}

/// Fraction in `[0, 1]` of a question earned by `submitted`.
///
/// Drag-and-drop and matrix questions earn partial credit per position or
/// row; every other type is all or nothing.
pub fn credit(kind: QuestionType, submitted: &Value, correct: &Value) -> f64 {
    if submitted.is_null() {
        return 0.0;
    }
    let all_or_nothing = |ok: bool| if ok { 1.0 } else { 0.0 };
    match kind {
        QuestionType::SingleChoice | QuestionType::TrueFalse => {
            all_or_nothing(same_scalar(submitted, correct))
        }
        QuestionType::Text => all_or_nothing(match (text(submitted), text(correct)) {
            (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => false,
        }),
        QuestionType::MultipleChoice => {
            let submitted = as_list(submitted);
            let correct = as_list(correct);
            let covers = |a: &[Value], b: &[Value]| {
                a.iter().all(|x| b.iter().any(|y| same_scalar(x, y)))
            };
            all_or_nothing(!correct.is_empty() && covers(&submitted, &correct) && covers(&correct, &submitted))
        }
        QuestionType::DragAndDrop => positional(submitted, correct),
        QuestionType::Matrix => match (submitted, correct) {
            (Value::Object(given), Value::Object(expected)) => {
                if expected.is_empty() {
                    return 0.0;
                }
                let right = expected
                    .iter()
                    .filter(|(row, column)| {
                        given.get(*row).is_some_and(|g| same_scalar(g, column))
                    })
                    .count();
                right as f64 / expected.len() as f64
            }
            _ => positional(submitted, correct),
        },
    }
}

/// Share of positions of `correct` holding the same value in `submitted`.
fn positional(submitted: &Value, correct: &Value) -> f64 {
    let (Some(given), Some(expected)) = (submitted.as_array(), correct.as_array()) else {
        return 0.0;
    };
    if expected.is_empty() {
        return 0.0;
    }
    let right = expected
        .iter()
        .zip(given)
        .filter(|(e, g)| same_scalar(g, e))
        .count();
    right as f64 / expected.len() as f64
}

fn same_scalar(a: &Value, b: &Value) -> bool {
    values_equal(a, b)
        || matches!((text(a), text(b)), (Some(x), Some(y)) if x.eq_ignore_ascii_case(&y))
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}
