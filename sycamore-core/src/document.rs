//! The contract between typed entities and storage records.
//!
//! A *record* is a plain [`bson::Document`]: field names mapped to primitives,
//! nested mappings and sequences. Typed entities never reach a backend
//! directly; they are first flattened into a record by [`EntityExt::to_record`],
//! a pure function with no storage side effects. The same module owns the
//! normalization applied to every record on its way in ([`stamp_record`]) and
//! on its way out ([`strip_identifier`]).

use bson::{Bson, DateTime, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Field holding the store-assigned identifier. Never surfaced to readers.
pub const ID_FIELD: &str = "_id";
/// Set once when a record is first written.
pub const CREATED_AT_FIELD: &str = "created_at";
/// Overwritten on every write.
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Core trait for every entity kind stored in a document store.
///
/// The collection an entity lives in is derived from [`Entity::kind`], so two
/// entity kinds only share a collection if their names are equal ignoring case.
///
/// # Example
///
/// ```ignore
/// use sycamore_core::document::Entity;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct GalleryItem {
///     pub title: Option<String>,
///     pub image_url: String,
/// }
///
/// impl Entity for GalleryItem {
///     fn kind() -> &'static str {
///         "GalleryItem"
///     }
/// }
///
/// assert_eq!(GalleryItem::collection_name(), "galleryitem");
/// ```
pub trait Entity: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// The entity kind name, e.g. `"MenuItem"`.
    fn kind() -> &'static str;

    /// Returns the name of the collection this entity kind is stored in.
    fn collection_name() -> String {
        collection_name(Self::kind())
    }
}

/// Conversions between entities and storage records.
///
/// Automatically implemented for every [`Entity`].
pub trait EntityExt: Entity {
    /// Flattens this entity into a storage-ready record.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not serialize to a mapping.
    fn to_record(&self) -> DocumentStoreResult<Document>;

    /// Rebuilds an entity from a stored record.
    ///
    /// Fields the entity does not declare (such as the timestamps) are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared field is missing or has the wrong type.
    fn from_record(record: Document) -> DocumentStoreResult<Self>;
}

impl<E: Entity> EntityExt for E {
    fn to_record(&self) -> DocumentStoreResult<Document> {
        match serialize_to_bson(self)? {
            Bson::Document(record) => Ok(record),
            other => Err(DocumentStoreError::NotADocument {
                kind: E::kind(),
                found: format!("{:?}", other.element_type()),
            }),
        }
    }

    fn from_record(record: Document) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(record))?)
    }
}

/// Maps a raw collection or entity kind name to its physical collection name.
pub fn collection_name(raw: &str) -> String {
    raw.to_lowercase()
}

/// Returns a copy of `record` carrying the system timestamps.
///
/// `created_at` is only filled in when the record has none; `updated_at` is
/// always replaced with `now`.
pub fn stamp_record(record: &Document, now: DateTime) -> Document {
    let mut stamped = record.clone();

    if !stamped.contains_key(CREATED_AT_FIELD) {
        stamped.insert(CREATED_AT_FIELD, now);
    }
    stamped.insert(UPDATED_AT_FIELD, now);

    stamped
}

/// Removes the store-assigned identifier from a record read back from a backend.
pub fn strip_identifier(mut record: Document) -> Document {
    record.remove(ID_FIELD);
    record
}

/// Renders a backend-assigned identifier as an opaque string.
pub fn identifier_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use bson::{doc, oid::ObjectId};

    use super::*;

    #[test]
    fn collection_names_are_lowercased() {
        assert_eq!(collection_name("MenuItem"), "menuitem");
        assert_eq!(collection_name("menuitem"), "menuitem");
        assert_eq!(collection_name("OpeningHours"), "openinghours");
    }

    #[test]
    fn stamping_keeps_existing_created_at() {
        let earlier = DateTime::from_millis(1_000);
        let now = DateTime::from_millis(2_000);
        let record = doc! { "name": "Sunday Roast", "created_at": earlier, "updated_at": earlier };

        let stamped = stamp_record(&record, now);

        assert_eq!(stamped.get_datetime(CREATED_AT_FIELD).ok(), Some(&earlier));
        assert_eq!(stamped.get_datetime(UPDATED_AT_FIELD).ok(), Some(&now));
        // the caller's record is left as it was
        assert_eq!(record.get_datetime(UPDATED_AT_FIELD).ok(), Some(&earlier));
    }

    #[test]
    fn stamping_sets_both_timestamps_on_fresh_records() {
        let now = DateTime::from_millis(5_000);
        let stamped = stamp_record(&doc! { "day": "Monday" }, now);

        assert_eq!(stamped.get_datetime(CREATED_AT_FIELD).ok(), Some(&now));
        assert_eq!(stamped.get_datetime(UPDATED_AT_FIELD).ok(), Some(&now));
        assert_eq!(stamped.get_str("day").ok(), Some("Monday"));
    }

    #[test]
    fn identifiers_are_stripped() {
        let record = doc! { "_id": ObjectId::new(), "title": "The Bar" };
        let stripped = strip_identifier(record);

        assert!(!stripped.contains_key(ID_FIELD));
        assert_eq!(stripped.get_str("title").ok(), Some("The Bar"));
    }

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::new();
        assert_eq!(identifier_to_string(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(identifier_to_string(&Bson::String("abc".into())), "abc");
    }
}
