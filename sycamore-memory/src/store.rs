//! In-memory storage implementation for document stores.
//!
//! Documents are kept per collection in insertion order behind an async-safe
//! read-write lock.

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use sycamore_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{ID_FIELD, identifier_to_string},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Query,
};

use crate::evaluator::DocumentEvaluator;

type StoreMap = HashMap<String, Vec<Document>>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// Queries scan every document in a collection; there is no indexing.
///
/// # Example
///
/// ```ignore
/// use sycamore_memory::InMemoryStore;
/// use sycamore_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(doc! { "day": "Monday" }, "openinghours").await?;
/// assert_eq!(store.list_collections().await?, vec!["openinghours".to_string()]);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, mut document: Document, collection: &str) -> DocumentStoreResult<String> {
        let mut store = self.store.write().await;
        let documents = store
            .entry(collection.to_string())
            .or_default();

        let id = match document.get(ID_FIELD) {
            Some(id) => {
                if documents.iter().any(|existing| existing.get(ID_FIELD) == Some(id)) {
                    return Err(DocumentStoreError::DuplicateId {
                        id: identifier_to_string(id),
                        collection: collection.to_string(),
                    });
                }
                id.clone()
            }
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert(ID_FIELD, id.clone());
                id
            }
        };

        documents.push(document);

        Ok(identifier_to_string(&id))
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        let store = self.store.read().await;
        let documents = match store.get(collection) {
            Some(documents) => documents,
            None => return Ok(vec![]),
        };

        let mut matched = Vec::with_capacity(query.limit.min(documents.len()));

        for document in documents {
            if matched.len() >= query.limit {
                break;
            }
            if DocumentEvaluator::matches(document, query.filter.as_ref())? {
                matched.push(document.clone());
            }
        }

        Ok(matched)
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.store
                .read()
                .await
                .keys()
                .cloned()
                .collect()
        )
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use sycamore_core::query::Filter;

    use super::*;

    #[tokio::test]
    async fn assigns_distinct_identifiers() {
        let store = InMemoryStore::new();

        let first = store.insert_document(doc! { "name": "Jane Doe" }, "booking").await.unwrap();
        let second = store.insert_document(doc! { "name": "Jane Doe" }, "booking").await.unwrap();

        assert_ne!(first, second);
        assert!(ObjectId::parse_str(&first).is_ok());

        let stored = store.query_documents(Query::new(), "booking").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|doc| doc.contains_key(ID_FIELD)));
    }

    #[tokio::test]
    async fn rejects_duplicate_explicit_identifier() {
        let store = InMemoryStore::new();
        let id = ObjectId::new();

        store.insert_document(doc! { "_id": id, "day": "Monday" }, "openinghours").await.unwrap();
        let err = store
            .insert_document(doc! { "_id": id, "day": "Tuesday" }, "openinghours")
            .await
            .unwrap_err();

        assert!(matches!(err, DocumentStoreError::DuplicateId { id: dup, collection } if dup == id.to_hex() && collection == "openinghours"));
    }

    #[tokio::test]
    async fn unknown_collection_reads_empty() {
        let store = InMemoryStore::new();

        let found = store.query_documents(Query::new(), "event").await.unwrap();

        assert!(found.is_empty());
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn limit_caps_matching_documents() {
        let store = InMemoryStore::new();
        for n in 0..5 {
            store.insert_document(doc! { "n": n, "category": "Food" }, "menuitem").await.unwrap();
        }
        store.insert_document(doc! { "category": "Drinks" }, "menuitem").await.unwrap();

        let query = Query::builder()
            .filter(Filter::eq("category", "Food"))
            .limit(3)
            .build();
        let found = store.query_documents(query, "menuitem").await.unwrap();

        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|doc| doc.get_str("category").ok() == Some("Food")));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryStore::builder().build().await.unwrap();
        let clone = store.clone();

        clone.insert_document(doc! { "title": "The Bar" }, "galleryitem").await.unwrap();

        assert_eq!(store.list_collections().await.unwrap(), vec!["galleryitem".to_string()]);
    }
}
