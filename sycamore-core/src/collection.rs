//! Collection handles for the create and query operations.
//!
//! A collection handle is cheap: it borrows the store's backend and carries the
//! normalized collection name. All record normalization happens here, so every
//! backend sees the same shape of data.
//!
//! - [`Collection`] - Works with raw records (`bson::Document`)
//! - [`TypedCollection`] - Works with a specific [`Entity`] type
//!
//! # Example
//!
//! ```ignore
//! let bookings = store.collection("Booking");
//! let id = bookings.create(&doc! { "name": "Jane Doe", "guests": 4 }).await?;
//!
//! let found = bookings.find(Query::new()).await?;
//! assert!(found.iter().all(|record| !record.contains_key("_id")));
//! ```

use bson::{DateTime, Document};
use std::marker::PhantomData;

use crate::{
    backend::DynStoreBackend,
    document::{Entity, EntityExt, collection_name, stamp_record, strip_identifier},
    error::DocumentStoreResult,
    query::Query,
};

#[derive(Debug)]
pub struct Collection<'a> {
    name: String,
    backend: &'a dyn DynStoreBackend,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(name: &str, backend: &'a dyn DynStoreBackend) -> Self {
        Self { name: collection_name(name), backend }
    }

    /// The normalized (lowercase) collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a copy of `record` stamped with the current time and returns the
    /// store-assigned identifier.
    pub async fn create(&self, record: &Document) -> DocumentStoreResult<String> {
        self.create_at(record, DateTime::now()).await
    }

    /// Same as [`Collection::create`] with an explicit write time.
    pub async fn create_at(&self, record: &Document, now: DateTime) -> DocumentStoreResult<String> {
        self.backend
            .insert_document(stamp_record(record, now), self.name())
            .await
    }

    /// Returns at most `query.limit` matching records, without their `_id`.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<Vec<Document>> {
        Ok(self
            .backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(strip_identifier)
            .collect())
    }
}

#[derive(Debug)]
pub struct TypedCollection<'a, E: Entity> {
    inner: Collection<'a>,
    _marker: PhantomData<E>,
}

impl<'a, E: Entity> TypedCollection<'a, E> {
    pub(crate) fn new(backend: &'a dyn DynStoreBackend) -> Self {
        Self {
            inner: Collection::new(E::kind(), backend),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// The untyped view of the same collection.
    pub fn raw(&self) -> &Collection<'a> {
        &self.inner
    }

    /// Flattens `entity` into a record and inserts it.
    pub async fn create(&self, entity: &E) -> DocumentStoreResult<String> {
        self.inner
            .create(&entity.to_record()?)
            .await
    }

    /// Queries the collection and decodes every record, failing on the first
    /// record that no longer matches `E`.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<Vec<E>> {
        self.inner
            .find(query)
            .await?
            .into_iter()
            .map(E::from_record)
            .collect()
    }
}
