//! DocumentStore - abstract document persistence.

use serde_json::{Map, Value};

use super::StoreError;
use crate::filter::Filter;
use crate::pipeline::{Pipeline, SortOrder, Stage};

/// Sort/skip/limit options for `find_documents`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Vec<(String, SortOrder)>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn sorted(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The equivalent pipeline for a find with these options.
    pub fn to_pipeline(&self, filter: &Filter) -> Pipeline {
        let mut pipeline = Pipeline::new().match_filter(filter.clone());
        if !self.sort.is_empty() {
            pipeline = pipeline.sort(self.sort.clone());
        }
        if self.skip > 0 {
            pipeline = pipeline.stage(Stage::Skip(self.skip));
        }
        if let Some(limit) = self.limit {
            pipeline = pipeline.stage(Stage::Limit(limit));
        }
        pipeline
    }
}

/// Abstract document storage.
///
/// Missing documents are reported as `Ok(None)` / `Ok(false)`, never as
/// errors. There are no transactions: multi-step flows read then write.
pub trait DocumentStore: Send + Sync {
    /// Insert a document. An `_id` is generated when absent. Returns the id.
    fn insert_document(&self, collection: &str, document: Value) -> Result<String, StoreError>;

    /// Get a document by id.
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the given top-level (or dotted) fields of a document.
    /// Returns false when the document does not exist.
    fn replace_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError>;

    /// Delete a document. Returns true if it existed.
    fn delete_document(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Find documents matching a filter.
    fn find_documents(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError>;

    /// Count documents matching a filter.
    fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    /// Run an aggregation pipeline over a collection.
    fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>, StoreError>;
}
