//! Handler for the batch creation endpoint.

use axum::{Json, extract::State};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::dto::links::{LinksRequest, LinksResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a batch from the given URLs, checks every link and returns the result.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "links_list": ["https://example.com", "https://missing.example.com"] }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "links_num": 1,
///   "status": "done",
///   "results": [
///     { "url": "https://example.com", "status": "available" },
///     { "url": "https://missing.example.com", "status": "unavailable",
///       "error": "unexpected status code: 404" }
///   ]
/// }
/// ```
///
/// # Cancellation
///
/// The check runs in its own task. If the client disconnects or the server
/// shuts down, in-flight probes are aborted and the batch is stored as
/// `failed` if links remain unchecked.
///
/// # Errors
///
/// Returns 400 Bad Request for an empty or blank-only list.
/// Returns 500 Internal Server Error if the batch could not be stored.
pub async fn create_batch_handler(
    State(state): State<AppState>,
    Json(payload): Json<LinksRequest>,
) -> Result<Json<LinksResponse>, AppError> {
    payload.validate()?;

    let token = state.shutdown.child_token();
    // Dropping this handler future (client gone) cancels the check.
    let _guard = token.clone().drop_guard();

    let service = Arc::clone(&state.links_service);
    // Tracked so shutdown waits for the final save of a detached check.
    let task = state.checks.spawn(async move {
        service
            .create_and_check_batch(&payload.links_list, token)
            .await
    });

    let batch = task.await.map_err(|e| {
        AppError::internal("Batch check task failed", json!({ "reason": e.to_string() }))
    })??;

    Ok(Json(LinksResponse::from(&batch)))
}
