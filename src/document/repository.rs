//! DocumentRepository - typed accessor for document CRUD operations.

use std::marker::PhantomData;

use serde_json::{Map, Value};

use super::{Document, DocumentStore, FindOptions, StoreError};
use crate::filter::Filter;

/// Typed repository for documents of one collection.
pub struct DocumentRepository<'a, S: ?Sized, D> {
    store: &'a S,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore + ?Sized, D: Document> DocumentRepository<'a, S, D> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Get a document by id.
    pub fn get(&self, id: &str) -> Result<Option<D>, StoreError> {
        match self.store.get_document(D::COLLECTION, id)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Insert a new document. Fails if the id is taken.
    pub fn insert(&self, document: &D) -> Result<String, StoreError> {
        self.store
            .insert_document(D::COLLECTION, serde_json::to_value(document)?)
    }

    /// Overwrite the given fields of a stored document.
    pub fn replace_fields(&self, id: &str, fields: Map<String, Value>) -> Result<bool, StoreError> {
        self.store.replace_fields(D::COLLECTION, id, fields)
    }

    /// Delete a document by id. Returns true if it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_document(D::COLLECTION, id)
    }

    /// Find documents matching a filter.
    pub fn find(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<D>, StoreError> {
        self.store
            .find_documents(D::COLLECTION, filter, options)?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    /// Find the first document matching a filter.
    pub fn find_one(&self, filter: &Filter) -> Result<Option<D>, StoreError> {
        Ok(self
            .find(filter, &FindOptions::default().limit(1))?
            .into_iter()
            .next())
    }

    /// Count documents matching a filter.
    pub fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        self.store.count_documents(D::COLLECTION, filter)
    }
}

/// Extension trait for typed document access on any DocumentStore.
pub trait DocumentsExt: DocumentStore {
    /// Get a typed document repository.
    fn documents<D: Document>(&self) -> DocumentRepository<'_, Self, D> {
        DocumentRepository::new(self)
    }
}

impl<S: DocumentStore + ?Sized> DocumentsExt for S {}
