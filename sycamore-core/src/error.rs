//! Errors raised by the document access layer and its backends.
//!
//! Backends report failures through these variants as-is; nothing in this
//! layer retries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// An entity could not be flattened into a record, or a record could not
    /// be read back as the requested entity.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The store client could not be created.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A record arrived with an explicit `_id` that the collection already holds.
    #[error("Duplicate identifier {id} in collection {collection}")]
    DuplicateId { id: String, collection: String },

    /// An entity did not serialize to a key-value mapping.
    #[error("{kind} is not a document: serialized as {found}")]
    NotADocument { kind: &'static str, found: String },

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<bson::error::Error> for DocumentStoreError {
    fn from(err: bson::error::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}
