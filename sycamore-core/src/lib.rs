//! Generic document access layer for the Sycamore Inn backend.
//!
//! This crate provides:
//!
//! - **Entity traits** ([`document`]) - The contract between typed entities and storage records
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing different storage backends
//! - **Query and filtering API** ([`query`]) - Equality filters and flat result limits
//! - **Collections interface** ([`collection`]) - Create and query operations with record normalization
//! - **Document store** ([`store`]) - Owns the backend handle and hands out collections
//! - **Error handling** ([`error`]) - Error and result types shared by every backend
//!
//! # Example
//!
//! ```ignore
//! use sycamore_core::{document::Entity, store::DocumentStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Booking {
//!     pub name: String,
//!     pub guests: u32,
//! }
//!
//! impl Entity for Booking {
//!     fn kind() -> &'static str {
//!         "Booking"
//!     }
//! }
//!
//! let id = store.typed_collection::<Booking>().create(&booking).await?;
//! ```

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
