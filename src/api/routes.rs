//! API route configuration.

use crate::api::handlers::{
    create_batch_handler, get_batch_handler, list_batches_handler, report_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST /links`          - Create and check a batch of URLs
/// - `POST /report`         - Render a report over several batches
/// - `GET  /batches`        - List batches (`?ids=1,2,3` for a subset)
/// - `GET  /batches/{id}`   - Show one batch
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_batch_handler))
        .route("/report", post(report_handler))
        .route("/batches", get(list_batches_handler))
        .route("/batches/{id}", get(get_batch_handler))
}
