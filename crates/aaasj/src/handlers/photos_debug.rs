//! Album page diagnostics for tuning the scraper.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use aaasj_auth::AdminUser;
use aaasj_core::photos::{diagnose_page, PageDiagnostics, PageSource, ScrapeError};
use aaasj_core::serde::deserialize_optional_string;

use crate::{
    handlers::{parse_json, AppError},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub share_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub share_url: String,
    pub actual_url: String,
    /// Empty when the link was not a short link.
    pub embed_url: String,
    pub source: PageSource,
    #[serde(flatten)]
    pub diagnostics: PageDiagnostics,
}

/// POST /api/photos/debug - fetches an album page and reports what each
/// URL pattern finds in it.
pub async fn debug_album_page(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request: DebugRequest = parse_json(&body)?;
    let share_url = request.share_url.ok_or(ScrapeError::MissingShareUrl)?;

    tracing::debug!(share_url = %share_url, "Diagnosing album page");

    let page = match state.album_fetcher.fetch_album_page(&share_url).await {
        Ok(page) => page,
        Err(e) => return Ok(fetch_failure(&e)),
    };

    let report = DebugReport {
        diagnostics: diagnose_page(&page.html),
        share_url,
        actual_url: page.actual_url,
        embed_url: page.embed_url.unwrap_or_default(),
        source: page.source,
    };

    Ok(Json(report).into_response())
}

fn fetch_failure(error: &ScrapeError) -> Response {
    tracing::warn!(url = ?error.url(), error = %error, "Album page diagnostics failed");

    let body = match error {
        ScrapeError::Status { url, status } => json!({
            "error": "Failed to fetch actual URL",
            "status": status,
            "actualUrl": url,
        }),
        ScrapeError::Fetch { url, message } => json!({
            "error": "Failed to fetch any URL",
            "message": message,
            "actualUrl": url,
        }),
        ScrapeError::MissingShareUrl => json!({ "error": error.to_string() }),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::app::create_app;
    use crate::photos::StaticPageFetcher;
    use crate::state::testing::{test_state, TestState, ADMIN_SESSION};

    use super::*;

    const SHARE_URL: &str = "https://photos.google.com/share/AF1Qip";

    fn debug_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/photos/debug")
            .header(header::AUTHORIZATION, format!("Bearer {ADMIN_SESSION}"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reports_pattern_counts() {
        let TestState { state, dir: _dir } = test_state().await;
        let page = r#"<img src="https://lh3.googleusercontent.com/pw/AAA=w200-h100-c">"#;
        let state = state
            .with_album_fetcher(Arc::new(StaticPageFetcher::default().with_page(SHARE_URL, page)));
        let app = create_app(state);

        let response = app
            .oneshot(debug_request(&format!(r#"{{"shareUrl":"{SHARE_URL}"}}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["shareUrl"], SHARE_URL);
        assert_eq!(json["embedUrl"], "");
        assert_eq!(json["source"], "actual");
        assert_eq!(json["htmlLength"], page.len());
        assert_eq!(json["patterns"].as_array().unwrap().len(), 8);
        assert_eq!(json["patterns"][0]["matches"], 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_500_with_details() {
        let TestState { state, dir: _dir } = test_state().await;
        let app = create_app(state);

        let response = app
            .oneshot(debug_request(&format!(r#"{{"shareUrl":"{SHARE_URL}"}}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to fetch actual URL");
        assert_eq!(json["status"], 404);
        assert_eq!(json["actualUrl"], SHARE_URL);
    }

    #[tokio::test]
    async fn test_missing_share_url() {
        let TestState { state, dir: _dir } = test_state().await;
        let app = create_app(state);

        let response = app.oneshot(debug_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Missing shareUrl");
    }
}
