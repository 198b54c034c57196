//! Handler for short code expansion.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::expand::ExpandResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code to its long URL without redirecting.
///
/// # Endpoint
///
/// `GET /api/expand/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
/// Returns 503 Service Unavailable if the storage backend fails.
pub async fn expand_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ExpandResponse>, AppError> {
    let long_url = state.shortener.expand(&code).await?;

    Ok(Json(ExpandResponse { code, long_url }))
}
