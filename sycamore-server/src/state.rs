//! Application state shared across handlers.

use std::sync::Arc;

use sycamore::{
    memory::InMemoryStore,
    mongodb::MongoDbStore,
    prelude::{DocumentStore, DocumentStoreResult, DynDocumentStore, IntoDynDocumentStore, StoreBackendBuilder},
};
use tracing::{info, warn};

use crate::{
    config::{AppConfig, StoreKind},
    repository::{Repositories, RevalidationPolicy},
};

/// Application state shared across all handlers.
///
/// Cloning is cheap; every clone points at the same store handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: DynDocumentStore,
    policy: RevalidationPolicy,
}

impl AppState {
    pub fn new(store: DynDocumentStore, policy: RevalidationPolicy) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, policy }),
        }
    }

    /// Open the backend named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client cannot be created, e.g. a
    /// malformed `DATABASE_URL`. MongoDB connects lazily, so an unreachable
    /// server surfaces on the first request instead.
    pub async fn connect(config: &AppConfig) -> DocumentStoreResult<Self> {
        let store = match config.store_backend {
            StoreKind::Memory => DocumentStore::new(InMemoryStore::builder().build().await?).into_dyn(),
            StoreKind::Mongodb => DocumentStore::new(
                MongoDbStore::builder(&config.database_url, &config.database_name)
                    .app_name(env!("CARGO_PKG_NAME"))
                    .build()
                    .await?,
            )
            .into_dyn(),
        };
        info!(backend = %config.store_backend, "document store ready");

        Ok(Self::new(store, config.invalid_record_policy))
    }

    #[must_use]
    pub fn store(&self) -> &DynDocumentStore {
        &self.inner.store
    }

    #[must_use]
    pub fn repositories(&self) -> Repositories<'_> {
        Repositories::new(&self.inner.store, self.inner.policy)
    }

    /// Release the store handle once no other clone of the state is alive.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner.store.shutdown().await,
            Err(_) => {
                warn!("application state still shared; skipping store shutdown");
                Ok(())
            }
        }
    }
}
