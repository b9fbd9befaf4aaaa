use async_trait::async_trait;
use futures::TryStreamExt;
use bson::Document;
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions},
};
use sycamore_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::{ID_FIELD, identifier_to_string},
    error::{DocumentStoreError, DocumentStoreResult},
    query::Query,
};

use crate::query::MongoQueryTranslator;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(url: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(url, database)
    }

    fn records(&self, collection: &str) -> MongoCollection<Document> {
        self.client.database(&self.database).collection(collection)
    }
}

fn insert_error(err: MongoError, document: &Document, collection: &str) -> DocumentStoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY => {
            DocumentStoreError::DuplicateId {
                id: document
                    .get(ID_FIELD)
                    .map(identifier_to_string)
                    .unwrap_or_default(),
                collection: collection.to_string(),
            }
        }
        _ => backend_error(err),
    }
}

fn backend_error(err: MongoError) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<String> {
        let inserted = self.records(collection)
            .insert_one(&document)
            .await
            .map_err(|e| insert_error(e, &document, collection))?;

        Ok(identifier_to_string(&inserted.inserted_id))
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Document>> {
        // a zero limit means "no limit" to the server
        if query.limit == 0 {
            return Ok(vec![]);
        }

        let mut options = FindOptions::default();
        options.limit = Some(i64::try_from(query.limit).unwrap_or(i64::MAX));

        let filter = MongoQueryTranslator::translate(query.filter.as_ref())?;
        let cursor = self.records(collection)
            .find(filter)
            .with_options(options)
            .await
            .map_err(backend_error)?;

        cursor.try_collect().await.map_err(backend_error)
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(backend_error)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        // waits for in-flight operations, then closes pooled connections
        self.client.shutdown().await;
        Ok(())
    }
}

/// Builds a [`MongoDbStore`] from a connection URL and a database name.
pub struct MongoDbStoreBuilder {
    url: String,
    database: String,
    app_name: Option<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(url: &str, database: &str) -> Self {
        Self {
            url: url.to_string(),
            database: database.to_string(),
            app_name: None,
        }
    }

    /// Name reported to the server in its connection logs.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.url)
            .await
            .map_err(|e| DocumentStoreError::Connection(e.to_string()))?;
        if self.app_name.is_some() {
            options.app_name = self.app_name;
        }

        let client = Client::with_options(options)
            .map_err(|e| DocumentStoreError::Connection(e.to_string()))?;

        Ok(MongoDbStore::new(client, self.database))
    }
}
