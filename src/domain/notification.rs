use serde::{Deserialize, Serialize};

use super::now_millis;
use crate::document::new_id;
use crate::Document;

/// A notification addressed to one user, to an OU subtree, or to everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default)]
    pub broadcast: bool,
    #[serde(default)]
    pub seen_by: Vec<String>,
    pub created_at: i64,
}

impl Notification {
    fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            body: body.into(),
            user: None,
            ou: None,
            broadcast: false,
            seen_by: Vec::new(),
            created_at: now_millis(),
        }
    }

    pub fn to_user(user: &str, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user: Some(user.to_string()),
            ..Self::new(name, body)
        }
    }

    pub fn to_ou(ou: &str, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            ou: Some(ou.to_string()),
            ..Self::new(name, body)
        }
    }

    pub fn broadcast(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            broadcast: true,
            ..Self::new(name, body)
        }
    }

    pub fn created_at(mut self, millis: i64) -> Self {
        self.created_at = millis;
        self
    }
}
