use async_trait::async_trait;
use bson::{Bson, Document};
use thiserror::Error;

use crate::db::collection::Collection;
use crate::error::AppError;

/// How many collection names the diagnostics snapshot reports.
pub const MAX_LISTED_COLLECTIONS: usize = 10;

/// Errors raised by document store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Outcome of probing the database for the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    /// No database handle was configured.
    Uninitialized,
    /// Collections could be listed.
    Working { collections: Vec<String> },
    /// A handle exists but the probe failed.
    Failing { error: String },
}

/// Data-access contract shared by every handler.
///
/// Abstracted as a trait so handlers can be tested without a real MongoDB.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist `record` and return the identifier assigned by the store.
    async fn insert(&self, collection: Collection, record: Document) -> Result<String, StoreError>;

    /// Fetch documents matching `filter`, at most `limit` of them when set.
    async fn fetch(
        &self,
        collection: Collection,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Probe connectivity. Never fails; problems are reported in the result.
    async fn diagnostics(&self) -> StoreHealth;
}

/// Render a document identifier the way clients see it.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Stamp the creation and update timestamps onto a new record.
pub fn stamp_timestamps(record: &mut Document) {
    let now = bson::DateTime::now();
    record.insert("created_at", now);
    record.insert("updated_at", now);
}

/// MongoDB implementation of the DocumentStore.
pub struct MongoDocumentStore {
    db: Option<mongodb::Database>,
}

impl MongoDocumentStore {
    pub fn new(db: mongodb::Database) -> Self {
        Self { db: Some(db) }
    }

    /// Build a store from a connection string and a database name.
    ///
    /// The driver connects lazily, so this only fails on a malformed URI.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = mongodb::Client::with_uri_str(uri).await?;
        Ok(Self::new(client.database(database)))
    }

    /// A store with no database behind it. Every read and write fails with
    /// [`StoreError::Unavailable`].
    pub fn unavailable() -> Self {
        Self { db: None }
    }

    fn collection(&self, collection: Collection) -> Result<mongodb::Collection<Document>, StoreError> {
        self.db
            .as_ref()
            .map(|db| db.collection::<Document>(collection.name()))
            .ok_or(StoreError::Unavailable)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert(&self, collection: Collection, mut record: Document) -> Result<String, StoreError> {
        let coll = self.collection(collection)?;
        stamp_timestamps(&mut record);

        let result = coll.insert_one(record).await?;
        let id = id_to_string(&result.inserted_id);
        tracing::debug!(%collection, %id, "Inserted document");
        Ok(id)
    }

    async fn fetch(
        &self,
        collection: Collection,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        use futures::TryStreamExt;
        use mongodb::options::FindOptions;

        let coll = self.collection(collection)?;
        let options = FindOptions::builder().limit(limit).build();

        let cursor = coll.find(filter).with_options(options).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn diagnostics(&self) -> StoreHealth {
        let Some(db) = &self.db else {
            return StoreHealth::Uninitialized;
        };

        match db.list_collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                StoreHealth::Working { collections: names }
            }
            Err(e) => {
                tracing::warn!(database = %db.name(), "Database probe failed: {e}");
                StoreHealth::Failing {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_id_to_string() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(id_to_string(&Bson::String("abc".into())), "abc");
        assert_eq!(id_to_string(&Bson::Int32(7)), "7");
    }

    #[test]
    fn test_stamp_timestamps() {
        let mut record = bson::doc! { "title": "Ep1" };
        stamp_timestamps(&mut record);
        let created = record.get_datetime("created_at").unwrap();
        let updated = record.get_datetime("updated_at").unwrap();
        assert_eq!(created, updated);
    }

    #[test]
    fn test_store_error_converts_to_database_error() {
        match AppError::from(StoreError::Unavailable) {
            AppError::Database(msg) => assert_eq!(msg, "Database not available"),
            other => panic!("Expected Database error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MongoDocumentStore::unavailable();

        let err = store
            .insert(Collection::Inquiry, bson::doc! { "name": "x" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));

        let err = store
            .fetch(Collection::PodcastEpisode, Document::new(), Some(5))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));

        assert_eq!(store.diagnostics().await, StoreHealth::Uninitialized);
    }
}
