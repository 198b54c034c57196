//! API route configuration.

use crate::api::handlers::{expand_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`        - Create short codes (batch-capable)
/// - `GET  /expand/{code}`  - Resolve a short code as JSON
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/expand/{code}", get(expand_handler))
}
