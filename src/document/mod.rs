//! Documents - schemaless persistence behind a small store trait.
//!
//! Every entity is a JSON document keyed by `_id`. Stores insert, patch,
//! delete, find and aggregate documents; typed access goes through the
//! `Document` trait and `DocumentRepository`.
//!
//! ## Example
//!
//! ```ignore
//! use orgdesk::{Document, DocumentsExt, InMemoryDocumentStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Document)]
//! #[document(collection = "organizational_units")]
//! struct OrganizationalUnit {
//!     #[serde(rename = "_id")]
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! let store = InMemoryDocumentStore::new();
//! store.documents::<OrganizationalUnit>().insert(&unit)?;
//! let loaded = store.documents::<OrganizationalUnit>().get(&unit.id)?;
//! ```

mod id;
mod in_memory;
mod repository;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

pub use id::{new_id, validate_id, ID_LEN};
pub use in_memory::InMemoryDocumentStore;
pub use repository::{DocumentRepository, DocumentsExt};
pub use store::{DocumentStore, FindOptions};

/// Trait for types stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name (e.g. "organizational_units", "notifications").
    const COLLECTION: &'static str;

    /// The document's `_id`.
    fn id(&self) -> &str;
}

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Identifier is not a well-formed document id.
    InvalidId(String),
    /// A document with this id already exists.
    Duplicate { collection: String, id: String },
    /// The document is not a JSON object.
    NotAnObject { collection: String },
    /// Serialization/deserialization error.
    Serde(String),
    /// Storage-level error.
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidId(id) => write!(f, "invalid document id: {:?}", id),
            StoreError::Duplicate { collection, id } => {
                write!(f, "document already exists: {}:{}", collection, id)
            }
            StoreError::NotAnObject { collection } => {
                write!(f, "document for {} is not an object", collection)
            }
            StoreError::Serde(msg) => write!(f, "document serialization error: {}", msg),
            StoreError::Storage(msg) => write!(f, "document storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
