use serde::{Deserialize, Serialize};

use super::{now_millis, CustomField};
use crate::document::new_id;
use crate::Document;

/// A training program grouping courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgram {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub fields: Vec<CustomField>,
    pub created_at: i64,
}

/// A course; standalone when it belongs to no program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default)]
    pub fields: Vec<CustomField>,
    pub created_at: i64,
}

impl TrainingProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            ou: None,
            company: None,
            courses: Vec::new(),
            fields: Vec::new(),
            created_at: now_millis(),
        }
    }

    /// Attach a course to this program, linking both sides.
    pub fn add_course(&mut self, course: &mut Course) {
        course.program = Some(self.id.clone());
        self.courses.push(course.id.clone());
    }
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            ou: None,
            company: None,
            program: None,
            fields: Vec::new(),
            created_at: now_millis(),
        }
    }
}
