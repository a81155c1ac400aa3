//! Google Photos Library proxy and the browser log sink used by the
//! album picker.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use aaasj_auth::AdminUser;
use aaasj_core::photos::merge_library_albums;
use aaasj_core::serde::deserialize_optional_string;

use crate::{
    handlers::{parse_json, AppError, RequestError},
    photos::{collect_albums, AlbumCollection, LibraryError},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    pub debug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLibraryAlbum {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientLog {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Google's error status and body, or `fallback` when the body is empty.
fn pass_through(error: LibraryError, fallback: &str) -> Result<Response, AppError> {
    match error {
        LibraryError::Api { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let body = if body.is_empty() {
                fallback.to_string()
            } else {
                body
            };
            Ok((status, body).into_response())
        }
        transport => Err(transport.into()),
    }
}

fn record_error(debug: &mut Map<String, Value>, prefix: &str, error: &LibraryError) {
    match error {
        LibraryError::Api { status, body } => {
            debug.insert(format!("{prefix}ErrorStatus"), json!(status));
            debug.insert(format!("{prefix}Error"), json!(body));
        }
        LibraryError::Transport(message) => {
            debug.insert(format!("{prefix}Error"), json!(message));
        }
    }
}

/// GET /api/google/photos/albums[?debug=1] - the admin's owned and shared
/// albums, merged by id and sorted by title.
///
/// With `debug=1` token details and per-listing counts are included and
/// listing errors are reported instead of returned.
pub async fn list_library_albums(
    AdminUser(session): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Result<Response, AppError> {
    let access_token = session
        .access_token
        .ok_or(RequestError::MissingAccessToken)?;
    let debug_enabled = query.debug.as_deref() == Some("1");
    let library = state.photos_library.as_ref();

    let mut debug = Map::new();
    debug.insert("haveAccessToken".to_string(), json!(true));

    if debug_enabled {
        match library.token_info(&access_token).await {
            Ok(info) => {
                debug.insert("tokenInfoStatus".to_string(), json!(info.status));
                debug.insert("tokenInfo".to_string(), info.body);
            }
            Err(e) => {
                debug.insert("tokenInfoError".to_string(), json!(e.to_string()));
            }
        }
    }

    let (owned, error) = collect_albums(library, &access_token, AlbumCollection::Owned).await;
    if let Some(e) = error {
        if !debug_enabled {
            return pass_through(e, "Failed to fetch albums");
        }
        record_error(&mut debug, "albums", &e);
    }
    debug.insert("ownedCount".to_string(), json!(owned.len()));

    let (shared, error) = collect_albums(library, &access_token, AlbumCollection::Shared).await;
    if let Some(e) = error {
        if !debug_enabled {
            return pass_through(e, "Failed to fetch shared albums");
        }
        record_error(&mut debug, "shared", &e);
    }
    debug.insert("sharedCount".to_string(), json!(shared.len()));

    let albums = merge_library_albums(owned, shared);

    if debug_enabled {
        let debug_value = Value::Object(debug.clone());
        tracing::info!(debug = %debug_value, "Photos library albums debug");
        return Ok(Json(json!({ "albums": albums, "debug": debug })).into_response());
    }

    tracing::debug!(albums = albums.len(), email = %session.email, "Photos library albums listed");
    Ok(Json(json!({ "albums": albums })).into_response())
}

/// POST /api/google/photos/albums - creates an album in the admin's library.
pub async fn create_library_album(
    AdminUser(session): AdminUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let access_token = session
        .access_token
        .ok_or(RequestError::MissingAccessToken)?;
    let request: CreateLibraryAlbum = parse_json(&body)?;
    let title = request.title.ok_or(RequestError::MissingTitle)?;

    match state.photos_library.create_album(&access_token, &title).await {
        Ok(created) => {
            tracing::info!(title = %title, email = %session.email, "Photos library album created");
            Ok((
                StatusCode::CREATED,
                [(header::CONTENT_TYPE, "application/json")],
                created,
            )
                .into_response())
        }
        Err(e) => pass_through(e, "Failed to create album"),
    }
}

/// POST /api/google/photos/console-log - relays a browser log line.
pub async fn console_log(body: Bytes) -> Result<StatusCode, AppError> {
    let entry: ClientLog = parse_json(&body)?;
    let message = match entry.message {
        Some(Value::String(message)) => message,
        _ => "client-log".to_string(),
    };
    let data = entry
        .data
        .map(|d| serde_json::to_string_pretty(&d).unwrap_or_default())
        .unwrap_or_default();

    match entry.level.as_deref() {
        Some("debug") => tracing::debug!(target: "client", data = %data, "{message}"),
        Some("warn") => tracing::warn!(target: "client", data = %data, "{message}"),
        Some("error") => tracing::error!(target: "client", data = %data, "{message}"),
        _ => tracing::info!(target: "client", data = %data, "{message}"),
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::app::create_app;
    use crate::photos::FakeLibrary;
    use crate::state::testing::{test_state, TestState, ADMIN_SESSION};

    use super::*;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    fn get_albums(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_SESSION}"))
            .body(Body::empty())
            .unwrap()
    }

    fn library() -> FakeLibrary {
        FakeLibrary {
            owned_pages: vec![
                vec![json!({ "id": "1", "title": "Zoo trip" })],
                vec![json!({ "id": "2", "title": "Gala" })],
            ],
            shared_pages: vec![vec![json!({ "id": "1", "title": "Zoo trip (shared)" })]],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_lists_merged_albums() {
        let TestState { state, dir: _dir } = test_state().await;
        let app = create_app(state.with_photos_library(Arc::new(library())));

        let (status, body) = send(&app, get_albums("/api/google/photos/albums")).await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        let titles: Vec<&str> = json["albums"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Gala", "Zoo trip (shared)"]);
        assert!(json.get("debug").is_none());
    }

    #[tokio::test]
    async fn test_api_error_is_passed_through() {
        let TestState { state, dir: _dir } = test_state().await;
        let library = FakeLibrary {
            shared_error: Some((403, "PERMISSION_DENIED".to_string())),
            ..library()
        };
        let app = create_app(state.with_photos_library(Arc::new(library)));

        let (status, body) = send(&app, get_albums("/api/google/photos/albums")).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn test_debug_mode_reports_errors_and_counts() {
        let TestState { state, dir: _dir } = test_state().await;
        let library = FakeLibrary {
            shared_error: Some((403, "PERMISSION_DENIED".to_string())),
            ..library()
        };
        let app = create_app(state.with_photos_library(Arc::new(library)));

        let (status, body) = send(&app, get_albums("/api/google/photos/albums?debug=1")).await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["albums"].as_array().unwrap().len(), 2);
        assert_eq!(json["debug"]["ownedCount"], 2);
        assert_eq!(json["debug"]["sharedCount"], 0);
        assert_eq!(json["debug"]["sharedErrorStatus"], 403);
        assert_eq!(json["debug"]["tokenInfoStatus"], 200);
    }

    #[tokio::test]
    async fn test_create_album() {
        let TestState { state, dir: _dir } = test_state().await;
        let library = Arc::new(FakeLibrary::default());
        let app = create_app(state.with_photos_library(library.clone()));

        let request = |body: &'static str| {
            Request::builder()
                .method("POST")
                .uri("/api/google/photos/albums")
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_SESSION}"))
                .body(Body::from(body))
                .unwrap()
        };

        let (status, body) = send(&app, request("{}")).await;
        assert_eq!((status, body.as_slice()), (StatusCode::BAD_REQUEST, &b"Missing title"[..]));

        let (status, body) = send(&app, request(r#"{"title":"Spring Fest"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["title"], "Spring Fest");
        assert_eq!(*library.created.lock().unwrap(), vec!["Spring Fest".to_string()]);
    }

    #[tokio::test]
    async fn test_console_log() {
        let TestState { state, dir: _dir } = test_state().await;
        let app = create_app(state);

        let log = |body: &'static str| {
            Request::builder()
                .method("POST")
                .uri("/api/google/photos/console-log")
                .body(Body::from(body))
                .unwrap()
        };

        let (status, _) = send(
            &app,
            log(r#"{"level":"warn","message":"picker closed","data":{"n":1}}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, log("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
