//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{BatchSummary, ShortenRequest, ShortenResponse, ShortenResultItem};
use crate::error::AppError;
use crate::state::AppState;

/// Creates shortened URLs for one or more long URLs.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Batch Processing
///
/// Processes URLs independently and in order. If one fails, others continue
/// processing. Each result includes either success data or error information.
/// Shortening the same URL twice returns the same code.
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "url": "https://example.com" }
///   ]
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "summary": {
///     "total": 1,
///     "successful": 1,
///     "failed": 0
///   },
///   "items": [
///     {
///       "long_url": "https://example.com",
///       "code": "G60jKicb00",
///       "short_url": "http://localhost:3000/G60jKicb00"
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is empty or larger than 1000 URLs.
/// Individual URL errors are returned in the response items array.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let total = payload.urls.len();
    let mut results = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for item in payload.urls {
        match state.shortener.shorten(&item.url).await {
            Ok(code) => {
                successful += 1;
                let short_url = state.shortener.short_url(&state.base_url, &code);
                results.push(ShortenResultItem::Success {
                    long_url: item.url,
                    code,
                    short_url,
                });
            }
            Err(err) => {
                failed += 1;
                results.push(ShortenResultItem::Error {
                    long_url: item.url,
                    error: AppError::from(err).to_error_info(),
                });
            }
        }
    }

    Ok(Json(ShortenResponse {
        summary: BatchSummary {
            total,
            successful,
            failed,
        },
        items: results,
    }))
}
