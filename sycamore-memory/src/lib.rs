//! In-memory document storage backend.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and backs the test suite
//! and local development runs (`STORE_BACKEND=memory`).
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Store-assigned identifiers** - Every record gets an `ObjectId` unless it brings its own
//! - **Equality filters** - Evaluates the shared query AST in place
//!
//! # Quick Start
//!
//! ```ignore
//! use sycamore::{prelude::*, memory::InMemoryStore};
//!
//! let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//! let id = store.create_document("Booking", &doc! { "name": "Jane Doe" }).await?;
//! ```

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
