//! Document access layer for the Sycamore Inn backend.
//!
//! This crate is the entry point for code that stores or reads documents. It
//! re-exports the core types from the sub-crates and gives access to the
//! storage backends.
//!
//! # Quick Start
//!
//! ```ignore
//! use sycamore::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
//!
//!     // Collection names are case-insensitive: both calls hit "booking"
//!     store
//!         .create_document("Booking", &doc! { "name": "Jane Doe", "guests": 4 })
//!         .await
//!         .unwrap();
//!     let bookings = store.get_documents("booking", None, DEFAULT_LIMIT).await.unwrap();
//!
//!     assert_eq!(bookings.len(), 1);
//!     assert!(bookings[0].contains_key("created_at"));
//!
//!     store.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the backend is picked at runtime (for example from configuration), convert
//! the typed store with `into_dyn`. The dynamic store exposes the same create,
//! query and collection operations.
//!
//! ```ignore
//! let store: DynDocumentStore = DocumentStore::new(backend).into_dyn();
//! let menu = store.typed_collection::<MenuItem>();
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - `mongodb` - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use sycamore_core::{backend, collection, document, error, query, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use sycamore_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use sycamore_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
