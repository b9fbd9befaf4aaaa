//! Convenient re-exports of commonly used types.
//!
//! ```ignore
//! use sycamore::prelude::*;
//! ```

pub use sycamore_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::{Collection, TypedCollection},
    document::{Entity, EntityExt},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{DEFAULT_LIMIT, Expr, Filter, Query, QueryBuilder, QueryVisitor},
    store::{DocumentStore, DynDocumentStore, IntoDynDocumentStore},
};
