//! Typed repositories, one per entity kind.
//!
//! Handlers never name a collection. They ask [`Repositories`] for the
//! repository of the kind they need, and the repository forwards to the generic
//! create/query primitives with the collection derived from the entity type.

use std::{fmt, marker::PhantomData, str::FromStr};

use sycamore::{
    bson::Document,
    document::EntityExt,
    error::DocumentStoreError,
    prelude::{DynDocumentStore, Entity, Filter, Query},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::{Booking, Event, GalleryItem, MenuItem, OpeningHours, Validate, ValidationError};

/// What to do with a stored record that no longer passes its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevalidationPolicy {
    /// Log the record and leave it out of the response.
    #[default]
    Skip,
    /// Fail the whole read.
    Fail,
}

impl FromStr for RevalidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            other => Err(format!("expected \"skip\" or \"fail\", got \"{other}\"")),
        }
    }
}

impl fmt::Display for RevalidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    #[error("stored {collection} record is invalid: {reason}")]
    InvalidRecord { collection: String, reason: String },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// The closed set of repositories backed by one store handle.
#[derive(Debug, Clone, Copy)]
pub struct Repositories<'a> {
    store: &'a DynDocumentStore,
    policy: RevalidationPolicy,
}

impl<'a> Repositories<'a> {
    pub fn new(store: &'a DynDocumentStore, policy: RevalidationPolicy) -> Self {
        Self { store, policy }
    }

    pub fn menu_items(&self) -> Repository<'a, MenuItem> {
        self.repository()
    }

    pub fn events(&self) -> Repository<'a, Event> {
        self.repository()
    }

    pub fn gallery_items(&self) -> Repository<'a, GalleryItem> {
        self.repository()
    }

    pub fn bookings(&self) -> Repository<'a, Booking> {
        self.repository()
    }

    pub fn opening_hours(&self) -> Repository<'a, OpeningHours> {
        self.repository()
    }

    fn repository<E: Entity + Validate>(&self) -> Repository<'a, E> {
        Repository {
            store: self.store,
            policy: self.policy,
            _marker: PhantomData,
        }
    }
}

#[derive(Debug)]
pub struct Repository<'a, E> {
    store: &'a DynDocumentStore,
    policy: RevalidationPolicy,
    _marker: PhantomData<E>,
}

impl<E: Entity + Validate> Repository<'_, E> {
    /// Validates `entity` and stores it, returning the store-assigned identifier.
    pub async fn create(&self, entity: &E) -> RepositoryResult<String> {
        entity.validate()?;

        let id = self.store
            .typed_collection::<E>()
            .create(entity)
            .await?;
        debug!(collection = %E::collection_name(), %id, "document created");

        Ok(id)
    }

    /// Lists every record of this kind (up to the default limit).
    pub async fn list(&self) -> RepositoryResult<Vec<E>> {
        self.find(Query::new()).await
    }

    async fn find(&self, query: Query) -> RepositoryResult<Vec<E>> {
        let records = self.store
            .typed_collection::<E>()
            .raw()
            .find(query)
            .await?;

        let mut entities = Vec::with_capacity(records.len());
        for record in records {
            match revalidate::<E>(record) {
                Ok(entity) => entities.push(entity),
                Err(reason) => match self.policy {
                    RevalidationPolicy::Skip => {
                        warn!(collection = %E::collection_name(), %reason, "skipping invalid stored record");
                    }
                    RevalidationPolicy::Fail => {
                        return Err(RepositoryError::InvalidRecord {
                            collection: E::collection_name(),
                            reason,
                        });
                    }
                },
            }
        }

        Ok(entities)
    }
}

impl Repository<'_, MenuItem> {
    /// Lists menu items, restricted to one category when given.
    ///
    /// An empty or blank category is the same as none.
    pub async fn list_by_category(&self, category: Option<&str>) -> RepositoryResult<Vec<MenuItem>> {
        let mut query = Query::builder();
        if let Some(category) = category.filter(|c| !c.trim().is_empty()) {
            query = query.filter(Filter::eq("category", category));
        }
        self.find(query.build()).await
    }
}

fn revalidate<E: Entity + Validate>(record: Document) -> Result<E, String> {
    let entity = E::from_record(record).map_err(|e| e.to_string())?;
    entity.validate().map_err(|e| e.to_string())?;
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use sycamore::{bson::doc, memory::InMemoryStore, prelude::*};

    use super::*;

    fn store() -> DynDocumentStore {
        DocumentStore::new(InMemoryStore::new()).into_dyn()
    }

    fn pint() -> MenuItem {
        MenuItem {
            name: "Cask Ale Pint".into(),
            description: None,
            price: 4.8,
            category: "Drinks".into(),
            image_url: None,
            is_featured: false,
        }
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Skip".parse::<RevalidationPolicy>(), Ok(RevalidationPolicy::Skip));
        assert_eq!(" fail ".parse::<RevalidationPolicy>(), Ok(RevalidationPolicy::Fail));
        assert!("ignore".parse::<RevalidationPolicy>().is_err());
    }

    #[tokio::test]
    async fn invalid_entities_never_reach_the_store() {
        let store = store();
        let repos = Repositories::new(&store, RevalidationPolicy::Skip);
        let free_beer = MenuItem { price: -4.8, ..pint() };

        let err = repos.menu_items().create(&free_beer).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Validation(ValidationError::Negative { .. })));
        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_filter_is_exact() {
        let store = store();
        let repos = Repositories::new(&store, RevalidationPolicy::Skip);
        let menu = repos.menu_items();
        menu.create(&pint()).await.unwrap();
        menu.create(&MenuItem { name: "Sunday Roast".into(), category: "Food".into(), price: 15.95, ..pint() })
            .await
            .unwrap();

        let drinks = menu.list_by_category(Some("Drinks")).await.unwrap();
        assert_eq!(drinks, vec![pint()]);

        assert_eq!(menu.list_by_category(None).await.unwrap().len(), 2);
        assert!(menu.list_by_category(Some("drinks")).await.unwrap().is_empty());
        assert_eq!(menu.list_by_category(Some("")).await.unwrap().len(), 2);
        assert_eq!(menu.list_by_category(Some("  ")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn skip_policy_drops_invalid_records() {
        let store = store();
        store.create_document("MenuItem", &doc! { "name": "Mystery", "category": "Food" }).await.unwrap();
        let repos = Repositories::new(&store, RevalidationPolicy::Skip);
        repos.menu_items().create(&pint()).await.unwrap();

        assert_eq!(repos.menu_items().list().await.unwrap(), vec![pint()]);
    }

    #[tokio::test]
    async fn fail_policy_rejects_the_whole_read() {
        let store = store();
        store
            .create_document("Booking", &doc! { "name": "Jane Doe", "phone": "555-0100", "date": "2024-03-01T19:00:00Z", "guests": 40 })
            .await
            .unwrap();
        let repos = Repositories::new(&store, RevalidationPolicy::Fail);

        let err = repos.bookings().list().await.unwrap_err();

        assert!(matches!(err, RepositoryError::InvalidRecord { ref collection, .. } if collection == "booking"));
    }
}
