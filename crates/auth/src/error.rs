use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Auth errors for the aaasj_auth crate.
///
/// Wraps the core `AuthError` and adds the failures that only happen at the
/// I/O edge.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] aaasj_core::auth::AuthError),

    /// HTTP client error during OIDC flow
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("provider not configured: {0}")]
    ProviderNotConfigured(String),
}

impl AuthError {
    pub fn unauthenticated() -> Self {
        Self::Core(aaasj_core::auth::AuthError::SessionNotFound)
    }

    pub fn unauthorized_domain() -> Self {
        Self::Core(aaasj_core::auth::AuthError::UnauthorizedDomain)
    }

    fn status_and_message(&self) -> (StatusCode, String) {
        use aaasj_core::auth::AuthError as CoreError;

        match self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidState => (StatusCode::BAD_REQUEST, self.to_string()),
                CoreError::SessionNotFound | CoreError::SessionExpired => (
                    StatusCode::UNAUTHORIZED,
                    "Authentication required".to_string(),
                ),
                CoreError::UnauthorizedDomain => (StatusCode::FORBIDDEN, self.to_string()),
                CoreError::InvalidToken(_) | CoreError::MissingClaim(_) => {
                    (StatusCode::UNAUTHORIZED, self.to_string())
                }
                CoreError::CodeExchange(_) | CoreError::Storage(_) | CoreError::Provider(_) => {
                    tracing::error!(error = %self, "Auth error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Http(_) => {
                tracing::error!(error = %self, "HTTP error during auth");
                (
                    StatusCode::BAD_GATEWAY,
                    "Authentication provider error".to_string(),
                )
            }
            AuthError::Config(_) => {
                tracing::error!(error = %self, "Config error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                )
            }
            AuthError::ProviderNotConfigured(provider) => (
                StatusCode::NOT_FOUND,
                format!("Authentication provider '{provider}' is not configured"),
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_errors_use_the_admin_api_messages() {
        assert_eq!(
            AuthError::unauthenticated().status_and_message(),
            (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string()
            )
        );
        assert_eq!(
            AuthError::Core(aaasj_core::auth::AuthError::SessionExpired).status_and_message(),
            (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string()
            )
        );
        assert_eq!(
            AuthError::unauthorized_domain().status_and_message(),
            (StatusCode::FORBIDDEN, "Unauthorized domain".to_string())
        );
    }

    #[test]
    fn internal_failures_are_not_leaked() {
        let err = AuthError::Core(aaasj_core::auth::AuthError::Storage("disk".into()));
        assert_eq!(
            err.status_and_message(),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string()
            )
        );
    }

    #[test]
    fn missing_provider_is_not_found() {
        let (status, message) =
            AuthError::ProviderNotConfigured("Google".into()).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Authentication provider 'Google' is not configured");
    }
}
