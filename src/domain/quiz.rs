use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::now_millis;
use crate::document::new_id;
use crate::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
    Assessment,
    Survey,
}

/// An assessment or survey. Questions live in their own collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: QuizKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub created_at: i64,
}

impl Quiz {
    pub fn new(name: impl Into<String>, kind: QuizKind) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            kind,
            ou: None,
            company: None,
            created_at: now_millis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    Text,
    DragAndDrop,
    Matrix,
}

/// A question of a quiz. `answer` holds the correct answer in the shape the
/// question type expects: a scalar, an array of choices, the correct order,
/// or a row-to-column object for matrices. Survey questions have none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: String,
    pub quiz: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(default)]
    pub order: u32,
}

impl Question {
    pub fn new(quiz: &Quiz, text: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: new_id(),
            quiz: quiz.id.clone(),
            text: text.into(),
            kind,
            options: Vec::new(),
            answer: None,
            points: None,
            order: 0,
        }
    }

    pub fn with_answer(mut self, answer: impl Into<Value>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = Some(points);
        self
    }
}

/// One user's submission of a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    #[serde(rename = "_id")]
    pub id: String,
    pub quiz: String,
    pub user: String,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
    pub submitted_at: i64,
}

impl Attempt {
    pub fn new(quiz: &Quiz, user: &str) -> Self {
        Self {
            id: new_id(),
            quiz: quiz.id.clone(),
            user: user.to_string(),
            answers: Vec::new(),
            submitted_at: now_millis(),
        }
    }

    pub fn answer(mut self, answer: SubmittedAnswer) -> Self {
        self.answers.push(answer);
        self
    }
}

/// A submitted answer. Clients put the value in one of several places
/// depending on the question widget: `value`, `field.value`,
/// `field.data.value` or `ordered` (for orderings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<AnswerField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SubmittedAnswer {
    pub fn value(question: &Question, value: impl Into<Value>) -> Self {
        Self {
            question: question.id.clone(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn field_value(question: &Question, value: impl Into<Value>) -> Self {
        Self {
            question: question.id.clone(),
            field: Some(AnswerField {
                value: Some(value.into()),
                data: None,
            }),
            ..Self::default()
        }
    }

    pub fn ordered(question: &Question, order: Vec<Value>) -> Self {
        Self {
            question: question.id.clone(),
            ordered: Some(order),
            ..Self::default()
        }
    }
}
