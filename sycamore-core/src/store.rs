//! Document store handles.
//!
//! - [`DocumentStore`] - Typed store bound to a specific backend implementation
//! - [`DynDocumentStore`] - Dynamic dispatch store for runtime backend selection
//!
//! A store is constructed once at startup and passed explicitly to whatever
//! needs it; there is no process-wide connection.
//!
//! # Example
//!
//! ```ignore
//! use sycamore_core::store::{DocumentStore, IntoDynDocumentStore};
//!
//! let store = DocumentStore::new(backend).into_dyn();
//! let id = store.create_document("Booking", &record).await?;
//! let records = store.get_documents("booking", None, DEFAULT_LIMIT).await?;
//! ```

use bson::Document;

use crate::{
    backend::{DynStoreBackend, StoreBackend},
    collection::{Collection, TypedCollection},
    document::Entity,
    error::DocumentStoreResult,
    query::Query,
};

/// A strongly-typed document store bound to a specific backend implementation.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend + 'static> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified entity kind.
    pub fn typed_collection<E: Entity>(&self) -> TypedCollection<'_, E> {
        TypedCollection::new(&self.backend)
    }

    /// Gets an untyped collection by name. The name is lowercased.
    pub fn collection(&self, name: &str) -> Collection<'_> {
        Collection::new(name, &self.backend)
    }

    /// Inserts one record into the named collection and returns its identifier.
    pub async fn create_document(&self, collection: &str, record: &Document) -> DocumentStoreResult<String> {
        self.collection(collection).create(record).await
    }

    /// Returns up to `limit` records of the named collection matching `filter`.
    pub async fn get_documents(
        &self,
        collection: &str,
        filter: Option<Document>,
        limit: usize,
    ) -> DocumentStoreResult<Vec<Document>> {
        self.collection(collection)
            .find(Query::builder().matching(filter).limit(limit).build())
            .await
    }

    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        StoreBackend::list_collections(&self.backend).await
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(self.backend).await
    }
}

/// A document store whose backend is chosen at runtime.
#[derive(Debug)]
pub struct DynDocumentStore {
    backend: Box<dyn DynStoreBackend>,
}

impl DynDocumentStore {
    pub fn new(backend: Box<dyn DynStoreBackend>) -> Self {
        Self { backend }
    }

    pub fn typed_collection<E: Entity>(&self) -> TypedCollection<'_, E> {
        TypedCollection::new(&*self.backend)
    }

    pub fn collection(&self, name: &str) -> Collection<'_> {
        Collection::new(name, &*self.backend)
    }

    pub async fn create_document(&self, collection: &str, record: &Document) -> DocumentStoreResult<String> {
        self.collection(collection).create(record).await
    }

    pub async fn get_documents(
        &self,
        collection: &str,
        filter: Option<Document>,
        limit: usize,
    ) -> DocumentStoreResult<Vec<Document>> {
        self.collection(collection)
            .find(Query::builder().matching(filter).limit(limit).build())
            .await
    }

    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        DynStoreBackend::list_collections(&*self.backend).await
    }

    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown_boxed().await
    }
}

pub trait IntoDynDocumentStore {
    fn into_dyn(self) -> DynDocumentStore;
}

impl<B: StoreBackend + 'static> IntoDynDocumentStore for DocumentStore<B> {
    fn into_dyn(self) -> DynDocumentStore {
        DynDocumentStore::new(Box::new(self.backend))
    }
}

impl IntoDynDocumentStore for DynDocumentStore {
    fn into_dyn(self) -> DynDocumentStore {
        self
    }
}
