//! HTTP handlers for auth routes.

use aaasj_core::auth::{
    calculate_expiry, email_to_name, generate_session_id, generate_state, is_allowed_domain,
    validate_return_to, AuthFlowState, Session, SessionId,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Duration, Utc};
use openidconnect::PkceCodeChallenge;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::extractors::OptionalUser;
use crate::AuthState;

/// Where a signed-in admin lands when no `return_to` was given.
const DEFAULT_RETURN_TO: &str = "/admin";

/// Query parameters for OAuth callback.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// Query parameters for the login endpoint.
#[derive(Deserialize, Default)]
pub struct LoginQuery {
    /// URL to redirect to after successful authentication.
    pub return_to: Option<String>,
}

/// The signed-in user as reported by `GET /auth/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub email: String,
    pub name: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for SessionUser {
    fn from(session: &Session) -> Self {
        Self {
            email: session.email.clone(),
            name: session.name.clone(),
            expires_at: session.expires_at,
        }
    }
}

/// Creates the auth router.
///
/// Routes:
/// - `GET /auth/google/login` - Initiate Google OIDC flow
/// - `GET /auth/google/callback` - Handle Google OIDC callback
/// - `POST /auth/logout` - End current session
/// - `GET /auth/me` - Get current authenticated user
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/auth/google/login", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

async fn google_login(
    State(state): State<AuthState>,
    Query(query): Query<LoginQuery>,
) -> Result<Redirect, AuthError> {
    let provider = state.provider()?;

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let csrf_state = generate_state();

    let return_to = query
        .return_to
        .as_deref()
        .and_then(validate_return_to)
        .map(String::from);

    let flow = AuthFlowState {
        pkce_verifier: pkce_verifier.secret().to_string(),
        created_at: Utc::now(),
        return_to,
    };
    state.sessions.store_auth_flow(&csrf_state, &flow).await?;

    let auth_url = provider
        .authorization_url(&csrf_state, pkce_challenge.as_str())
        .await?;

    Ok(Redirect::to(auth_url.as_str()))
}

async fn google_callback(
    State(state): State<AuthState>,
    Query(params): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AuthError> {
    let flow = state
        .sessions
        .take_auth_flow(&params.state)
        .await?
        .ok_or(AuthError::Core(aaasj_core::auth::AuthError::InvalidState))?;

    let claims = state
        .provider()?
        .exchange_code(&params.code, &flow.pkce_verifier)
        .await?;

    let email = claims
        .email
        .ok_or_else(|| aaasj_core::auth::AuthError::MissingClaim("email".to_string()))?;

    if !is_allowed_domain(&email, &state.config.allowed_domain) {
        tracing::warn!(%email, "Rejected sign-in outside the organization domain");
        return Err(AuthError::unauthorized_domain());
    }

    let now = Utc::now();
    let session = Session {
        id: generate_session_id(),
        name: claims.name.or_else(|| Some(email_to_name(&email))),
        email,
        access_token: claims.access_token,
        created_at: now,
        expires_at: calculate_expiry(now, Duration::seconds(state.config.session_ttl_seconds())),
    };
    state.sessions.create_session(&session).await?;

    tracing::info!(email = %session.email, "Admin signed in");

    let cookie = Cookie::build((state.config.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.config.session_ttl_seconds()))
        .build();

    let redirect_url = flow
        .return_to
        .unwrap_or_else(|| DEFAULT_RETURN_TO.to_string());
    Ok((jar.add(cookie), Redirect::to(&redirect_url)))
}

async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AuthError> {
    if let Some(cookie) = jar.get(&state.config.cookie_name) {
        let session_id = SessionId::new(cookie.value().to_string());
        state.sessions.delete_session(&session_id).await?;
    }

    let jar = jar.remove(Cookie::build(state.config.cookie_name.clone()).path("/"));
    Ok((jar, StatusCode::NO_CONTENT))
}

async fn me(OptionalUser(session): OptionalUser) -> Result<Json<SessionUser>, AuthError> {
    session
        .as_ref()
        .map(|s| Json(SessionUser::from(s)))
        .ok_or_else(AuthError::unauthenticated)
}
