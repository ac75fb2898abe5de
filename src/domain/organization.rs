use serde::{Deserialize, Serialize};

use super::{now_millis, CustomField};
use crate::document::new_id;
use crate::Document;

/// A node of the organizational hierarchy. Roots have no parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationalUnit {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub fields: Vec<CustomField>,
    pub created_at: i64,
}

impl OrganizationalUnit {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            parent: None,
            company: None,
            fields: Vec::new(),
            created_at: now_millis(),
        }
    }

    pub fn child_of(parent: &OrganizationalUnit, name: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.id.clone()),
            company: parent.company.clone(),
            ..Self::root(name)
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub created_at: i64,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            email: email.into(),
            ou: None,
            company: None,
            role: None,
            created_at: now_millis(),
        }
    }

    pub fn in_ou(mut self, ou: &OrganizationalUnit) -> Self {
        self.ou = Some(ou.id.clone());
        self.company = ou.company.clone();
        self
    }
}
