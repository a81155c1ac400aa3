use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use aaasj_auth::auth_routes;
use aaasj_core::security::{MAX_FILES_PER_REQUEST, MAX_FILE_SIZE};

use crate::{
    handlers::{
        albums::{create_album, delete_album, list_albums, update_album},
        events::{create_event, delete_event, import_from_site, list_events, update_event},
        google_photos::{console_log, create_library_album, list_library_albums},
        health::{healthz, livez},
        photos_debug::debug_album_page,
        scholarship::{mail_debug, mail_status, send_test_email, submit_application},
    },
    middleware::{cors_layer, rate_limit, security_headers},
    state::AppState,
};

/// Largest scholarship submission: every upload at its limit plus the
/// generated PDF and the text fields.
const SUBMISSION_BODY_LIMIT: usize = (MAX_FILES_PER_REQUEST + 1) * MAX_FILE_SIZE + 1024 * 1024;

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        // Events
        .route(
            "/events",
            get(list_events)
                .post(create_event)
                .put(update_event)
                .delete(delete_event),
        )
        .route("/events/import-from-site", post(import_from_site))
        // Shared albums
        .route(
            "/photos/albums",
            get(list_albums)
                .post(create_album)
                .put(update_album)
                .delete(delete_album),
        )
        .route("/photos/debug", post(debug_album_page))
        // Google Photos Library proxy
        .route(
            "/google/photos/albums",
            get(list_library_albums).post(create_library_album),
        )
        .route("/google/photos/console-log", post(console_log))
        // Scholarship
        .route(
            "/scholarship/submit",
            get(mail_status)
                .post(submit_application)
                .layer(DefaultBodyLimit::max(SUBMISSION_BODY_LIMIT)),
        )
        .route("/scholarship/debug", get(mail_debug))
        .route("/scholarship/test", get(send_test_email));

    let mut app = Router::new()
        .nest("/api", api_routes)
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .merge(auth_routes().with_state::<AppState>(state.auth.clone()))
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(cors_layer());

    for layer in security_headers() {
        app = app.layer(layer);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .with_state(state)
}
