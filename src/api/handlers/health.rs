//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Last store write failed, or shutting down
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "3 batches in data/state.json" },
///     "lifecycle": { "status": "ok", "message": "Accepting batches" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let lifecycle = check_lifecycle(&state);

    let all_healthy = storage.status == "ok" && lifecycle.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { storage, lifecycle },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Fails while the most recent store write has not succeeded.
async fn check_storage(state: &AppState) -> CheckStatus {
    let count = state.repository.len().await;
    let path = state.repository.path().display();

    if state.repository.last_write_failed() {
        CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Last write to {path} failed")),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("{count} batches in {path}")),
        }
    }
}

fn check_lifecycle(state: &AppState) -> CheckStatus {
    if state.shutdown.is_cancelled() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Shutting down".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Accepting batches".to_string()),
        }
    }
}
