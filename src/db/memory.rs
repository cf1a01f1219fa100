//! In-memory [`DocumentStore`] used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;

use crate::db::collection::Collection;
use crate::db::store::{
    stamp_timestamps, DocumentStore, StoreError, StoreHealth, MAX_LISTED_COLLECTIONS,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a document in place as-is, bypassing id and timestamp stamping.
    pub fn seed(&self, collection: Collection, doc: Document) {
        self.collections
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(doc);
    }

    pub fn documents(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, mut record: Document) -> Result<String, StoreError> {
        let id = ObjectId::new();
        record.insert("_id", id);
        stamp_timestamps(&mut record);
        self.seed(collection, record);
        Ok(id.to_hex())
    }

    async fn fetch(
        &self,
        collection: Collection,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        let cap = limit
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX);
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|doc| matches(doc, &filter))
            .take(cap)
            .collect())
    }

    async fn diagnostics(&self) -> StoreHealth {
        let mut names: Vec<String> = self
            .collections
            .lock()
            .unwrap()
            .keys()
            .map(|c| c.name().to_string())
            .collect();
        names.sort();
        names.truncate(MAX_LISTED_COLLECTIONS);

        StoreHealth::Working { collections: names }
    }
}
