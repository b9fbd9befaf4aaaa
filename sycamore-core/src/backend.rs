//! The storage seam.
//!
//! [`StoreBackend`] is the only contact point between the document access
//! layer and a concrete store, and it only knows how to insert and query:
//! records are never updated or deleted. [`DynStoreBackend`] is its
//! object-safe mirror, used once the backend is picked at runtime, and
//! [`StoreBackendBuilder`] opens a backend.
//!
//! ```ignore
//! use sycamore_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let id = backend.insert_document(doc! { "name": "Jane Doe", "guests": 4 }, "booking").await?;
//! ```

use async_trait::async_trait;
use bson::Document;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Query};

/// A document store that can insert and query records.
///
/// Implementations are shared between request tasks, so every method takes
/// `&self` and must tolerate concurrent calls. Single-document writes are
/// atomic; nothing wider is.
///
/// # Collections
///
/// Collection names arrive already normalized. Backends create collections lazily
/// on first insert and treat an unknown collection as empty when reading.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a single record into a collection and returns the identifier the
    /// store assigned to it.
    ///
    /// If the record already carries an `_id`, the backend keeps it and reports a
    /// [`DuplicateId`](crate::error::DocumentStoreError::DuplicateId)
    /// error when that identifier is taken.
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<String>;

    /// Returns up to `query.limit` records matching `query.filter`, in store order.
    ///
    /// Returned records still contain the store's `_id` field.
    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>>;

    /// Names of the collections that currently exist.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Releases connections and other resources held by the backend.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe counterpart of [`StoreBackend`], blanket-implemented for every backend.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<String>;
    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>>;
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<String> {
        StoreBackend::insert_document(self, document, collection).await
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        StoreBackend::list_collections(self).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
