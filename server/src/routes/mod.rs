use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::events::{
    archive_event, archived_events, create_event, delete_event, favorite_events, get_event,
    list_events, toggle_favorite, upcoming_events,
};
use crate::handlers::{health_check, root};
use crate::media::PUBLIC_PREFIX;
use crate::state::AppState;

/// Event API routes without the outer middleware stack.
pub fn api_routes(state: AppState) -> Router {
    let uploads = ServeDir::new(state.media.dir());
    let body_limit = match state.max_upload_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    // Literal sub-resources are registered ahead of `:id`.
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/api/events",
            get(list_events).post(create_event).layer(body_limit),
        )
        .route("/api/events/upcoming", get(upcoming_events))
        .route("/api/events/archived", get(archived_events))
        .route("/api/events/favorites", get(favorite_events))
        .route("/api/events/:id", get(get_event).delete(delete_event))
        .route("/api/events/:id/archive", put(archive_event))
        .route("/api/events/:id/favorite", put(toggle_favorite))
        .nest_service(PUBLIC_PREFIX, uploads)
        .with_state(state)
}

pub fn create_routes(state: AppState) -> Router {
    api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
