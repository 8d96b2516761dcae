//! `/api/events` handlers
//!
//! Request bodies are validated here; the service only ever sees an
//! [`crate::models::EventDto`].

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::models::EventPayload;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, no_content, ok};
use crate::utils::timestamp;
use crate::validation::validate_event;

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.events.get_all_events().await?;
    Ok(ok(events))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = path?;
    let event = state.events.get_event_by_id(id).await?;
    Ok(ok(event))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<EventPayload>, JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = body?;
    let dto = validate_event(payload, timestamp::now())?;
    let event = state.events.create_event(dto).await?;
    Ok(created(event))
}

/// PUT /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<EventPayload>, JsonRejection>,
) -> AppResult<Response> {
    let Path(id) = path?;
    let Json(payload) = body?;
    let dto = validate_event(payload, timestamp::now())?;
    let event = state.events.update_event(id, dto).await?;
    Ok(ok(event))
}

/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = path?;
    state.events.delete_event(id).await?;
    Ok(no_content())
}
