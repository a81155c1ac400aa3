//! Health check endpoints.
//!
//! - `/livez` - liveness check (immediate 200, no checks)
//! - `/healthz` - reads both JSON stores and reports their sizes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::AppState;

/// GET /livez - Basic liveness check.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - 200 with record counts, 503 when a store cannot be read.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    let events = state.event_repo.list_events().await;
    let albums = state.album_repo.list_albums().await;

    match (events, albums) {
        (Ok(events), Ok(albums)) => Json(json!({
            "status": "ok",
            "events": events.len(),
            "albums": albums.len(),
            "mailConfigured": state.mailer.is_some(),
        }))
        .into_response(),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
