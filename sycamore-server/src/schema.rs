//! Entity schemas accepted and served by the API.
//!
//! Each entity kind is a plain serde struct: the struct decides which fields
//! exist, which are optional and what their defaults are. Range and format
//! rules that serde cannot express live in the [`Validate`] impls. Nothing here
//! touches storage.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use sycamore::document::Entity;
use thiserror::Error;
use url::Url;

pub const MIN_GUESTS: u32 = 1;
pub const MAX_GUESTS: u32 = 20;

/// Why a payload or stored record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        actual: u32,
    },
    #[error("{field} must be a non-negative number")]
    Negative { field: &'static str },
    #[error("{field} must be an http or https URL, got {url}")]
    NotHttpUrl { field: &'static str, url: String },
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Shape and range checks beyond what deserialization already enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn http_url(field: &'static str, url: &Url) -> Result<(), ValidationError> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(ValidationError::NotHttpUrl {
            field,
            url: url.to_string(),
        }),
    }
}

fn optional_http_url(field: &'static str, url: Option<&Url>) -> Result<(), ValidationError> {
    url.map_or(Ok(()), |url| http_url(field, url))
}

/// Naive layouts accepted after RFC 3339, read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an RFC 3339 timestamp, a naive date-time or a bare date.
///
/// Inputs without an offset are taken as UTC; a bare date is midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        de::Error::custom(format!(
            "invalid date \"{raw}\", expected RFC 3339, YYYY-MM-DDTHH:MM[:SS] or YYYY-MM-DD"
        ))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// e.g. "Food", "Drinks"
    pub category: String,
    pub image_url: Option<Url>,
    #[serde(default)]
    pub is_featured: bool,
}

impl Entity for MenuItem {
    fn kind() -> &'static str {
        "MenuItem"
    }
}

impl Validate for MenuItem {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ValidationError::Negative { field: "price" });
        }
        optional_http_url("image_url", self.image_url.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub date: DateTime<Utc>,
    pub image_url: Option<Url>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entity for Event {
    fn kind() -> &'static str {
        "Event"
    }
}

impl Validate for Event {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_http_url("image_url", self.image_url.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub title: Option<String>,
    pub image_url: Url,
    /// e.g. "Food", "Bar", "Interior"
    pub category: Option<String>,
}

impl Entity for GalleryItem {
    fn kind() -> &'static str {
        "GalleryItem"
    }
}

impl Validate for GalleryItem {
    fn validate(&self) -> Result<(), ValidationError> {
        http_url("image_url", &self.image_url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub date: DateTime<Utc>,
    pub guests: u32,
    pub notes: Option<String>,
}

impl Entity for Booking {
    fn kind() -> &'static str {
        "Booking"
    }
}

impl Validate for Booking {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&self.guests) {
            return Err(ValidationError::OutOfRange {
                field: "guests",
                min: MIN_GUESTS,
                max: MAX_GUESTS,
                actual: self.guests,
            });
        }
        Ok(())
    }
}

/// Opening times for one day. Times are "HH:MM" strings and are not parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    /// e.g. "Monday"
    pub day: String,
    pub open: String,
    pub close: String,
    pub kitchen_close: Option<String>,
}

impl Entity for OpeningHours {
    fn kind() -> &'static str {
        "OpeningHours"
    }
}

impl Validate for OpeningHours {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    fn booking(guests: u32) -> Booking {
        Booking {
            name: "Jane Doe".into(),
            phone: "555-0100".into(),
            email: None,
            date: "2024-03-01T19:00:00Z".parse().unwrap(),
            guests,
            notes: None,
        }
    }

    #[test]
    fn guests_bounds_are_inclusive() {
        assert!(booking(1).validate().is_ok());
        assert!(booking(20).validate().is_ok());
        assert_eq!(
            booking(0).validate(),
            Err(ValidationError::OutOfRange { field: "guests", min: 1, max: 20, actual: 0 })
        );
        assert!(booking(21).validate().is_err());
    }

    #[test]
    fn booking_requires_name() {
        let payload = json!({ "phone": "555-0100", "date": "2024-03-01T19:00:00Z", "guests": 4 });
        assert!(serde_json::from_value::<Booking>(payload).is_err());
    }

    #[test]
    fn booking_rejects_negative_guests_at_deserialization() {
        let payload = json!({ "name": "Jane Doe", "phone": "555-0100", "date": "2024-03-01T19:00:00Z", "guests": -1 });
        assert!(serde_json::from_value::<Booking>(payload).is_err());
    }

    #[test]
    fn booking_date_accepts_naive_and_date_only_forms() {
        let parse = |date: &str| {
            serde_json::from_value::<Booking>(json!({
                "name": "Jane Doe",
                "phone": "555-0100",
                "date": date,
                "guests": 4,
            }))
            .map(|booking| booking.date.to_rfc3339())
        };

        assert_eq!(parse("2024-03-01T19:00:00Z").unwrap(), "2024-03-01T19:00:00+00:00");
        assert_eq!(parse("2024-03-01T20:00:00+01:00").unwrap(), "2024-03-01T19:00:00+00:00");
        assert_eq!(parse("2024-03-01T19:00:00").unwrap(), "2024-03-01T19:00:00+00:00");
        assert_eq!(parse("2024-03-01T19:00").unwrap(), "2024-03-01T19:00:00+00:00");
        assert_eq!(parse("2024-03-01 19:00").unwrap(), "2024-03-01T19:00:00+00:00");
        assert_eq!(parse("2024-03-01").unwrap(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn booking_date_rejects_garbage() {
        for date in ["", "tomorrow", "2024-13-01", "01/03/2024"] {
            let payload = json!({ "name": "Jane Doe", "phone": "555-0100", "date": date, "guests": 4 });
            let err = serde_json::from_value::<Booking>(payload).unwrap_err();
            assert!(err.to_string().contains("invalid date"), "{date}: {err}");
        }
    }

    #[test]
    fn event_date_round_trips_as_rfc3339() {
        let event: Event = serde_json::from_value(json!({
            "title": "Pub Quiz Night",
            "date": "2024-03-07T20:00",
        }))
        .unwrap();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["date"], "2024-03-07T20:00:00Z");
        assert_eq!(serde_json::from_value::<Event>(value).unwrap(), event);
    }

    #[test]
    fn menu_item_defaults() {
        let item: MenuItem = serde_json::from_value(json!({
            "name": "Fish & Chips",
            "price": 13.5,
            "category": "Food",
        }))
        .unwrap();

        assert!(!item.is_featured);
        assert!(item.description.is_none());
        assert!(item.image_url.is_none());
        assert!(item.validate().is_ok());
    }

    #[test]
    fn menu_item_rejects_negative_price() {
        let item = MenuItem {
            name: "Refund".into(),
            description: None,
            price: -1.0,
            category: "Food".into(),
            image_url: None,
            is_featured: false,
        };
        assert_eq!(item.validate(), Err(ValidationError::Negative { field: "price" }));
    }

    #[test]
    fn gallery_requires_http_image() {
        let ftp = GalleryItem {
            title: None,
            image_url: "ftp://example.com/bar.jpg".parse().unwrap(),
            category: None,
        };
        assert!(matches!(ftp.validate(), Err(ValidationError::NotHttpUrl { field: "image_url", .. })));

        let missing = serde_json::from_value::<GalleryItem>(json!({ "title": "The Bar" }));
        assert!(missing.is_err());
    }

    #[test]
    fn event_tags_default_to_empty() {
        let event: Event = serde_json::from_value(json!({
            "title": "Pub Quiz Night",
            "date": "2024-03-07T20:00:00Z",
        }))
        .unwrap();

        assert!(event.tags.is_empty());
        assert!(!event.is_recurring);
    }

    #[test]
    fn collection_names_are_distinct() {
        let names: HashSet<String> = [
            MenuItem::collection_name(),
            Event::collection_name(),
            GalleryItem::collection_name(),
            Booking::collection_name(),
            OpeningHours::collection_name(),
        ]
        .into_iter()
        .collect();

        assert_eq!(names.len(), 5);
        assert!(names.contains("menuitem"));
        assert!(names.contains("openinghours"));
    }
}
