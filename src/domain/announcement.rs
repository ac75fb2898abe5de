use serde::{Deserialize, Serialize};

use super::now_millis;
use crate::document::new_id;
use crate::Document;

/// An announcement published to an OU, collecting user responses inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub responses: Vec<AnnouncementResponse>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub user: String,
    pub response: String,
    pub responded_at: i64,
}

impl Announcement {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            body: body.into(),
            ou: None,
            company: None,
            responses: Vec::new(),
            created_at: now_millis(),
        }
    }

    pub fn respond(&mut self, user: &str, response: impl Into<String>, responded_at: i64) {
        self.responses.push(AnnouncementResponse {
            user: user.to_string(),
            response: response.into(),
            responded_at,
        });
    }
}
