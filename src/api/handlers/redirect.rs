//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Lookups go through the configured storage, so in tiered mode repeated
/// redirects for a hot code are served from the cache.
///
/// Stored URLs are arbitrary strings. One that cannot be carried in a
/// `Location` header (control characters, for example) is still available
/// through `GET /api/expand/{code}`.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 422 Unprocessable Entity if the stored URL is not a valid header value.
/// Returns 503 Service Unavailable if the storage backend fails.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let long_url = state.shortener.expand(&code).await?;

    let location = HeaderValue::from_str(&long_url).map_err(|_| {
        warn!(%code, "Stored URL cannot be used as a Location header");
        AppError::unprocessable(
            "Stored URL cannot be used as a redirect target",
            json!({ "code": code, "expand": format!("/api/expand/{}", code) }),
        )
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}
