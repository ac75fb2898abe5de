//! Domain documents.
//!
//! Plain serde structs stored through the `Document` trait. References
//! between documents are ids resolved at query time by the report
//! pipelines; nothing enforces that a referenced document exists.
//! Timestamps are epoch milliseconds.

mod announcement;
mod notification;
mod organization;
mod quiz;
mod training;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use announcement::{Announcement, AnnouncementResponse};
pub use notification::Notification;
pub use organization::{OrganizationalUnit, User};
pub use quiz::{AnswerField, Attempt, Question, QuestionType, Quiz, QuizKind, SubmittedAnswer};
pub use training::{Course, TrainingProgram};

/// A labelled custom field, searched by the rule translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    pub data: String,
}

impl CustomField {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
