//! Sample content for a fresh deployment.
//!
//! Seeding is unconditional: running it twice stores every sample twice.
//! Records are inserted one by one and nothing is rolled back if an insert
//! fails partway.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::{
    repository::{Repositories, RepositoryResult},
    schema::{Event, GalleryItem, MenuItem, OpeningHours, ValidationError},
};

/// Number of records inserted per kind by one [`seed`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub menu_items: usize,
    pub events: usize,
    pub gallery_items: usize,
    pub opening_hours: usize,
}

fn image(url: &str) -> Result<Url, ValidationError> {
    Url::parse(url).map_err(|_| ValidationError::NotHttpUrl {
        field: "image_url",
        url: url.to_string(),
    })
}

pub fn sample_menu() -> Result<Vec<MenuItem>, ValidationError> {
    let item = |name: &str, description: &str, price: f64, category: &str, url: &str| -> Result<MenuItem, ValidationError> {
        Ok(MenuItem {
            name: name.into(),
            description: Some(description.into()),
            price,
            category: category.into(),
            image_url: Some(image(url)?),
            is_featured: false,
        })
    };

    Ok(vec![
        item(
            "Sunday Roast",
            "Roast beef, Yorkshire pudding, seasonal veg, rich gravy.",
            15.95,
            "Food",
            "https://images.unsplash.com/photo-1604908176997-431206b7b42f",
        )?,
        item(
            "Fish & Chips",
            "Beer-battered cod, thick-cut chips, mushy peas.",
            13.50,
            "Food",
            "https://images.unsplash.com/photo-1558036117-15d82a90b9b9",
        )?,
        item(
            "Cask Ale Pint",
            "Rotating selection of local bitters and ales.",
            4.80,
            "Drinks",
            "https://images.unsplash.com/photo-1541343672885-9be56236302a",
        )?,
    ])
}

pub fn sample_events(now: DateTime<Utc>) -> Result<Vec<Event>, ValidationError> {
    Ok(vec![
        Event {
            title: "Pub Quiz Night".into(),
            description: Some("Test your knowledge every Thursday 8pm.".into()),
            date: now,
            image_url: Some(image("https://images.unsplash.com/photo-1529400971008-f566de0e6dfc")?),
            is_recurring: true,
            tags: vec!["quiz".into(), "community".into()],
        },
        Event {
            title: "Sunday Roast Special".into(),
            description: Some("Traditional roasts served all day Sunday.".into()),
            date: now,
            image_url: Some(image("https://images.unsplash.com/photo-1511690656952-34342bb7c2f2")?),
            is_recurring: true,
            tags: vec!["food".into(), "sunday".into()],
        },
    ])
}

pub fn sample_gallery() -> Result<Vec<GalleryItem>, ValidationError> {
    [
        ("The Bar", "https://images.unsplash.com/photo-1541534401786-2077eed87a72", "Bar"),
        ("Cosy Corner", "https://images.unsplash.com/photo-1512917774080-9991f1c4c750", "Interior"),
        ("Steak & Chips", "https://images.unsplash.com/photo-1544025162-d76694265947", "Food"),
    ]
    .into_iter()
    .map(|(title, url, category)| -> Result<GalleryItem, ValidationError> {
        Ok(GalleryItem {
            title: Some(title.into()),
            image_url: image(url)?,
            category: Some(category.into()),
        })
    })
    .collect()
}

pub fn sample_opening_hours() -> Vec<OpeningHours> {
    [
        ("Monday", "12:00", "23:00", "21:00"),
        ("Tuesday", "12:00", "23:00", "21:00"),
        ("Wednesday", "12:00", "23:00", "21:00"),
        ("Thursday", "12:00", "23:30", "21:30"),
        ("Friday", "12:00", "00:00", "22:00"),
        ("Saturday", "11:00", "00:00", "22:00"),
        ("Sunday", "11:00", "22:30", "20:30"),
    ]
    .into_iter()
    .map(|(day, open, close, kitchen_close)| OpeningHours {
        day: day.into(),
        open: open.into(),
        close: close.into(),
        kitchen_close: Some(kitchen_close.into()),
    })
    .collect()
}

/// Inserts the sample menu, events, gallery and opening hours.
pub async fn seed(repos: &Repositories<'_>, now: DateTime<Utc>) -> RepositoryResult<SeedReport> {
    let mut report = SeedReport::default();

    for item in sample_menu()? {
        repos.menu_items().create(&item).await?;
        report.menu_items += 1;
    }
    for event in sample_events(now)? {
        repos.events().create(&event).await?;
        report.events += 1;
    }
    for item in sample_gallery()? {
        repos.gallery_items().create(&item).await?;
        report.gallery_items += 1;
    }
    for hours in sample_opening_hours() {
        repos.opening_hours().create(&hours).await?;
        report.opening_hours += 1;
    }

    info!(?report, "sample content seeded");

    Ok(report)
}
