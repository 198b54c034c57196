//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::services::ShortenError;
use crate::state::AppState;

/// Key used to probe storage. Longer than any generated code, so it never
/// resolves.
const PROBE_KEY: &str = "__health_probe__";

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Storage reachable
/// - **503 Service Unavailable**: Storage lookup failed
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Mode: tiered" },
///     "cache": { "status": "ok", "message": "Entries: 42" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;

    let cache_check = CheckStatus {
        status: "ok".to_string(),
        message: Some(format!("Entries: {}", state.shortener.cached_entries())),
    };

    let healthy = storage_check.status == "ok";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage: storage_check,
            cache: cache_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Issues a lookup for a key that cannot exist; only transport errors fail.
async fn check_storage(state: &AppState) -> CheckStatus {
    let mode = state.shortener.storage_kind();

    match state.shortener.expand(PROBE_KEY).await {
        Ok(_) | Err(ShortenError::NotFound) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Mode: {}", mode)),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Storage error ({}): {}", mode, e)),
        },
    }
}
