//! HTTP routes.
//!
//! Handlers are thin: they extract and validate input, call a typed repository
//! and serialize the result. CORS is fully permissive.

use axum::{
    Json, Router,
    extract::{FromRequest, Query, Request, State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    error::{AppError, Result},
    schema::{Booking, Event, GalleryItem, MenuItem, OpeningHours, Validate, ValidationError},
    seed,
    state::AppState,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/test", get(test_connection))
        .route("/seed", post(seed_data))
        .route("/menu", get(menu))
        .route("/events", get(events))
        .route("/gallery", get(gallery))
        .route("/hours", get(hours))
        .route("/book", post(book))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON body that has also passed its [`Validate`] checks.
///
/// Parse failures and validation failures both reject with 422.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ValidationError::Malformed(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Connectivity check: lists the collections the store currently holds.
///
/// Always answers 200; a store failure is reported in the body.
async fn test_connection(State(state): State<AppState>) -> Json<Value> {
    match state.store().list_collections().await {
        Ok(collections) => Json(json!({ "status": "ok", "collections": collections })),
        Err(e) => {
            error!(error = %e, "store connectivity check failed");
            Json(json!({ "status": "error", "message": e.to_string() }))
        }
    }
}

async fn seed_data(State(state): State<AppState>) -> Result<Json<Value>> {
    let report = seed::seed(&state.repositories(), Utc::now()).await?;
    Ok(Json(json!({ "status": "seeded", "inserted": report })))
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

async fn menu(State(state): State<AppState>, Query(query): Query<MenuQuery>) -> Result<Json<Vec<MenuItem>>> {
    let items = state
        .repositories()
        .menu_items()
        .list_by_category(query.category.as_deref())
        .await?;
    Ok(Json(items))
}

async fn events(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.repositories().events().list().await?))
}

async fn gallery(State(state): State<AppState>) -> Result<Json<Vec<GalleryItem>>> {
    Ok(Json(state.repositories().gallery_items().list().await?))
}

async fn hours(State(state): State<AppState>) -> Result<Json<Vec<OpeningHours>>> {
    Ok(Json(state.repositories().opening_hours().list().await?))
}

async fn book(State(state): State<AppState>, ValidatedJson(booking): ValidatedJson<Booking>) -> Result<Json<Value>> {
    let id = state.repositories().bookings().create(&booking).await?;
    info!(%id, guests = booking.guests, date = %booking.date, "booking received");
    Ok(Json(json!({ "status": "received" })))
}
