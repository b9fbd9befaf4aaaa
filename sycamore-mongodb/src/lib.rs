//! MongoDB backend implementation.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! It is enabled through the `mongodb` feature of the facade crate:
//!
//! ```toml
//! [dependencies]
//! sycamore = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The driver connects lazily and pools connections internally, so building the
//! store never blocks on the server being reachable; the first operation does.
//!
//! # Example
//!
//! ```ignore
//! use sycamore::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! let store = MongoDbStore::builder("mongodb://localhost:27017", "appdb")
//!     .build()
//!     .await?;
//! ```

pub mod query;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
