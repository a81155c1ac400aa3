//! Axum extractors for authentication.

use aaasj_core::auth::{is_allowed_domain, is_session_expired, Session, SessionId};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::error::AuthError;
use crate::AuthState;

/// Session ID from `Authorization: Bearer`, falling back to the session cookie.
fn session_id_from_parts(parts: &Parts, cookie_name: &str) -> Option<SessionId> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(SessionId::new(token.to_string()));
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|cookie| SessionId::new(cookie.value().to_string()))
}

/// Resolves the caller's session and checks it belongs to the organization.
async fn admin_session(parts: &Parts, auth_state: &AuthState) -> Result<Session, AuthError> {
    let session_id = session_id_from_parts(parts, &auth_state.config.cookie_name)
        .ok_or_else(AuthError::unauthenticated)?;

    let session = auth_state
        .sessions
        .get_session(&session_id)
        .await?
        .ok_or_else(AuthError::unauthenticated)?;

    if is_session_expired(&session, Utc::now()) {
        return Err(aaasj_core::auth::AuthError::SessionExpired.into());
    }

    if !is_allowed_domain(&session.email, &auth_state.config.allowed_domain) {
        tracing::warn!(email = %session.email, "Session outside the organization domain");
        return Err(AuthError::unauthorized_domain());
    }

    Ok(session)
}

/// Signed-in organization member. Rejects with a JSON 401 when there is no
/// valid session, 403 when the account is outside the allowed domain.
pub struct AdminUser(pub Session);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        admin_session(parts, &auth_state).await.map(AdminUser)
    }
}

/// Like [`AdminUser`], but yields `None` instead of rejecting.
pub struct OptionalUser(pub Option<Session>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        Ok(OptionalUser(admin_session(parts, &auth_state).await.ok()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aaasj_core::auth::SessionRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use chrono::Duration;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{AuthConfig, SessionStore};

    async fn state_with(sessions: &[(&str, &str, Duration)]) -> AuthState {
        let store = SessionStore::new();
        let now = Utc::now();
        for (id, email, ttl) in sessions {
            store
                .create_session(&Session {
                    id: SessionId::new(id.to_string()),
                    email: email.to_string(),
                    name: None,
                    access_token: None,
                    created_at: now,
                    expires_at: now + *ttl,
                })
                .await
                .unwrap();
        }
        let config = AuthConfig::local("http://localhost:3000".parse().unwrap());
        AuthState::with_provider(Arc::new(store), config, None)
    }

    fn app(state: AuthState) -> Router {
        Router::new()
            .route(
                "/admin",
                get(|AdminUser(session): AdminUser| async move { session.email }),
            )
            .route(
                "/maybe",
                get(|OptionalUser(session): OptionalUser| async move {
                    session.map_or_else(|| "anonymous".to_string(), |s| s.email)
                }),
            )
            .with_state(state)
    }

    async fn call(app: Router, uri: &str, header: Option<(&str, &str)>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri);
        if let Some((name, value)) = header {
            request = request.header(name, value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn admin_without_session_is_401() {
        let state = state_with(&[]).await;

        let (status, body) = call(app(state), "/admin", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Authentication required"}"#);
    }

    #[tokio::test]
    async fn admin_with_bearer_session() {
        let state = state_with(&[("s1", "board@aaa-sj.org", Duration::hours(1))]).await;

        let (status, body) = call(app(state), "/admin", Some(("authorization", "Bearer s1"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "board@aaa-sj.org");
    }

    #[tokio::test]
    async fn admin_with_cookie_session() {
        let state = state_with(&[("s1", "board@aaa-sj.org", Duration::hours(1))]).await;

        let (status, _) = call(app(state), "/admin", Some(("cookie", "aaasj_session=s1"))).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_outside_domain_is_403() {
        let state = state_with(&[("s1", "someone@gmail.com", Duration::hours(1))]).await;

        let (status, body) = call(app(state), "/admin", Some(("authorization", "Bearer s1"))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"Unauthorized domain"}"#);
    }

    #[tokio::test]
    async fn expired_session_is_401() {
        let state = state_with(&[("s1", "board@aaa-sj.org", Duration::seconds(-5))]).await;

        let (status, _) = call(app(state), "/admin", Some(("authorization", "Bearer s1"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn optional_user_never_rejects() {
        let state = state_with(&[
            ("member", "board@aaa-sj.org", Duration::hours(1)),
            ("outsider", "someone@gmail.com", Duration::hours(1)),
        ])
        .await;

        let (_, anonymous) = call(app(state.clone()), "/maybe", None).await;
        let (_, outsider) = call(
            app(state.clone()),
            "/maybe",
            Some(("authorization", "Bearer outsider")),
        )
        .await;
        let (status, member) =
            call(app(state), "/maybe", Some(("authorization", "Bearer member"))).await;

        assert_eq!(anonymous, "anonymous");
        assert_eq!(outsider, "anonymous");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(member, "board@aaa-sj.org");
    }
}
