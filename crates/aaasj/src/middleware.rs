//! Request hardening: per-client rate limiting on the API, CORS and the
//! security response headers.

use std::{net::SocketAddr, sync::PoisonError, time::Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, request::Parts, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use aaasj_core::security::{client_key, content_security_policy, is_allowed_origin};

use crate::state::AppState;

/// Tracked clients above which expired windows are dropped.
const PRUNE_THRESHOLD: usize = 10_000;

/// Fixed-window rate limit for `/api/*`, keyed by forwarded or peer address.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !request.uri().path().starts_with("/api/") {
        return next.run(request).await;
    }

    let forwarded_for = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let key = client_key(forwarded_for, peer);

    let admitted = {
        let now = Instant::now();
        let mut limiter = state
            .rate_limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if limiter.tracked_clients() > PRUNE_THRESHOLD {
            limiter.prune(now);
        }
        limiter.check(&key, now)
    };

    if !admitted {
        tracing::warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests" })),
        )
            .into_response();
    }

    next.run(request).await
}

/// CORS restricted to the site's own origins.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _: &Parts| origin.to_str().is_ok_and(is_allowed_origin),
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Headers set on every response, overriding any set by a handler.
pub fn security_headers() -> Vec<SetResponseHeaderLayer<Option<HeaderValue>>> {
    let fixed = [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::X_XSS_PROTECTION, "1; mode=block"),
        (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    ];

    let mut layers: Vec<SetResponseHeaderLayer<Option<HeaderValue>>> = fixed
        .into_iter()
        .map(|(name, value)| header_layer(name, HeaderValue::from_str(value).ok()))
        .collect();
    layers.push(header_layer(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_str(&content_security_policy()).ok(),
    ));
    layers
}

fn header_layer(
    name: HeaderName,
    value: Option<HeaderValue>,
) -> SetResponseHeaderLayer<Option<HeaderValue>> {
    SetResponseHeaderLayer::overriding(name, value)
}
