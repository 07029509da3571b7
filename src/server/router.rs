use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::{api, pages, AppState};

/// Create the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes();

    Router::new()
        // --- Forms ---
        .route("/", get(pages::studio_form).post(pages::studio_submit))
        .route("/classic", get(pages::classic_form).post(pages::classic_submit))
        // --- API ---
        .route("/api/generate", post(api::generate))
        .route("/api/styles", get(api::styles))
        .route("/status", get(api::status))
        // --- Middleware ---
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
