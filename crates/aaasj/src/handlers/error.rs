use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use aaasj_core::albums::{album_error_to_status_code, AlbumError};
use aaasj_core::events::{event_error_to_status_code, EventError};
use aaasj_core::photos::{scrape_error_to_status_code, ScrapeError};
use aaasj_core::scholarship::{scholarship_error_to_status_code, ScholarshipError};
use aaasj_core::security::UploadError;
use aaasj_core::storage::{repository_error_to_status_code, RepositoryError};

use crate::photos::LibraryError;

/// Request-level failures raised by the handlers themselves.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Body that is not valid JSON for the endpoint; carries the parse message.
    #[error("{0}")]
    InvalidBody(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// The session holds no Google access token.
    #[error("Unauthorized")]
    MissingAccessToken,

    #[error("Missing title")]
    MissingTitle,
}

fn request_error_to_status_code(error: &RequestError) -> u16 {
    match error {
        RequestError::InvalidBody(_) | RequestError::MissingTitle => 400,
        RequestError::MissingAccessToken => 401,
        RequestError::NotFound(_) => 404,
    }
}

/// Parses a JSON request body regardless of its declared content type.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(body).map_err(|e| RequestError::InvalidBody(e.to_string()))
}

/// Handler error wrapping `anyhow::Error`.
///
/// Known error types are downcast to pick the status code; the body is the
/// error message as plain text.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> u16 {
        let err = &self.0;
        if let Some(e) = err.downcast_ref::<RequestError>() {
            request_error_to_status_code(e)
        } else if let Some(e) = err.downcast_ref::<RepositoryError>() {
            repository_error_to_status_code(e)
        } else if let Some(e) = err.downcast_ref::<EventError>() {
            event_error_to_status_code(e)
        } else if let Some(e) = err.downcast_ref::<AlbumError>() {
            album_error_to_status_code(e)
        } else if let Some(e) = err.downcast_ref::<ScrapeError>() {
            scrape_error_to_status_code(e)
        } else if let Some(e) = err.downcast_ref::<ScholarshipError>() {
            scholarship_error_to_status_code(e)
        } else if err.downcast_ref::<UploadError>().is_some() {
            400
        } else if let Some(e) = err.downcast_ref::<LibraryError>() {
            match e {
                LibraryError::Api { status, .. } => *status,
                LibraryError::Transport(_) => 502,
            }
        } else {
            500
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = %status_code, error = %self.0, "Request rejected");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
