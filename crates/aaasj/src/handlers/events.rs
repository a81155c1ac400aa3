//! Event CRUD handlers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use aaasj_auth::AdminUser;
use aaasj_core::events::{
    order_for_display, site_events, CreateEventRequest, EventError, EventItem, ImportSummary,
    UpdateEventRequest,
};
use aaasj_core::storage::RepositoryError;

use crate::{
    handlers::{parse_json, AppError, RequestError},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct DeleteEventQuery {
    pub id: Option<String>,
}

/// GET /api/events - upcoming events soonest first, then past events
/// latest first.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventItem>>, AppError> {
    let events = state.event_repo.list_events().await?;
    Ok(Json(order_for_display(events)))
}

/// POST /api/events
pub async fn create_event(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: CreateEventRequest = parse_json(&body)?;
    let event = request.into_event(Uuid::new_v4().to_string())?;

    state.event_repo.create_event(&event).await?;
    tracing::info!(event_id = %event.id, title = %event.title, by = %admin.email, "Event created");

    Ok((StatusCode::CREATED, Json(event)).into_response())
}

/// PUT /api/events - overwrites the provided fields of an event.
pub async fn update_event(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EventItem>, AppError> {
    let request: UpdateEventRequest = parse_json(&body)?;
    let id = request.id()?;

    let mut event = state
        .event_repo
        .get_event(id)
        .await?
        .ok_or(RequestError::NotFound("Not found"))?;
    request.apply_to(&mut event);

    state.event_repo.update_event(&event).await?;
    tracing::info!(event_id = %event.id, by = %admin.email, "Event updated");

    Ok(Json(event))
}

/// DELETE /api/events?id= - succeeds whether or not the event exists.
pub async fn delete_event(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<DeleteEventQuery>,
) -> Result<StatusCode, AppError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or(EventError::MissingId)?;

    match state.event_repo.delete_event(&id).await {
        Ok(()) => tracing::info!(event_id = %id, by = %admin.email, "Event deleted"),
        Err(RepositoryError::NotFound { .. }) => {
            tracing::debug!(event_id = %id, "Delete of unknown event ignored");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/events/import-from-site - merges the built-in site catalogue.
pub async fn import_from_site(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = state.event_repo.import_events(&site_events()).await?;
    tracing::info!(
        added = summary.added,
        total = summary.total,
        by = %admin.email,
        "Site events imported"
    );
    Ok(Json(summary))
}
