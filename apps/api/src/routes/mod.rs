pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};

use crate::render::INDEX_HTML;
use crate::session::handlers;
use crate::state::AppState;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume),
        )
        .route("/api/v1/sessions/:id/search", post(handlers::handle_search))
        .route(
            "/api/v1/sessions/:id/navigate",
            post(handlers::handle_navigate),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
