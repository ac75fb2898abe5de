//! InMemoryDocumentStore - HashMap-backed document store for tests and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

use super::{new_id, DocumentStore, FindOptions, StoreError};
use crate::filter::Filter;
use crate::pipeline::{self, CollectionSource, Pipeline};
use crate::value::set_path;

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// In-memory document store.
///
/// Collections keep documents ordered by id, so ids generated by `new_id`
/// iterate in insertion-time order. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: &str) -> Result<usize, StoreError> {
        Ok(self.read()?.get(collection).map(BTreeMap::len).unwrap_or(0))
    }
}

/// Snapshot of the collections a pipeline reads through joins.
struct Snapshot<'a>(&'a Collections);

impl CollectionSource for Snapshot<'_> {
    fn collection(&self, name: &str) -> Vec<Value> {
        self.0
            .get(name)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert_document(&self, collection: &str, document: Value) -> Result<String, StoreError> {
        let Value::Object(mut map) = document else {
            return Err(StoreError::NotAnObject {
                collection: collection.to_string(),
            });
        };

        let id = match map.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = new_id();
                map.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut storage = self.write()?;
        let docs = storage.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id,
            });
        }
        docs.insert(id.clone(), Value::Object(map));
        tracing::debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let storage = self.read()?;
        Ok(storage.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    fn replace_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let mut storage = self.write()?;
        let Some(doc) = storage.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
            return Ok(false);
        };
        for (path, value) in fields {
            if path == "_id" {
                continue;
            }
            set_path(doc, &path, value);
        }
        Ok(true)
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut storage = self.write()?;
        Ok(storage
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }

    fn find_documents(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError> {
        self.aggregate(collection, &options.to_pipeline(filter))
    }

    fn count_documents(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let storage = self.read()?;
        let count = storage
            .get(collection)
            .map(|docs| docs.values().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> Result<Vec<Value>, StoreError> {
        let storage = self.read()?;
        let snapshot = Snapshot(&storage);
        let input = snapshot.collection(collection);
        tracing::debug!(
            collection,
            stages = pipeline.len(),
            input = input.len(),
            "running pipeline"
        );
        Ok(pipeline::run(&snapshot, input, pipeline))
    }
}
