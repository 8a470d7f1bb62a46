//! Handlers for batch lookup endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::batch::{BatchListQuery, BatchListResponse, BatchResponse};
use crate::api::dto::pagination::PaginationMeta;
use crate::domain::entities::BatchId;
use crate::error::AppError;
use crate::state::AppState;

/// Returns one stored batch.
///
/// # Endpoint
///
/// `GET /api/batches/{id}`
///
/// # Errors
///
/// Returns 404 Not Found for an unknown ID.
pub async fn get_batch_handler(
    State(state): State<AppState>,
    Path(id): Path<BatchId>,
) -> Result<Json<BatchResponse>, AppError> {
    let batch = state.links_service.get_batch(id).await?;
    Ok(Json(BatchResponse::from(&batch)))
}

/// Returns several stored batches.
///
/// # Endpoint
///
/// `GET /api/batches?ids=1,2,3` or `GET /api/batches?page=1&page_size=25`
///
/// With `ids`, the lookup is all-or-nothing and pagination is ignored.
/// Without `ids`, stored batches are paged in ID order.
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 1000)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
/// Returns 404 Not Found if any requested ID is unknown.
pub async fn list_batches_handler(
    State(state): State<AppState>,
    Query(query): Query<BatchListQuery>,
) -> Result<Json<BatchListResponse>, AppError> {
    if !query.ids.is_empty() {
        let batches = state.links_service.get_batches(&query.ids).await?;
        return Ok(Json(BatchListResponse::from(batches)));
    }

    let (offset, limit) = query
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let (batches, total_items) = state.links_service.list_batches(offset, limit).await?;
    let meta = PaginationMeta::new(&query.pagination, total_items);

    Ok(Json(BatchListResponse::from(batches).with_pagination(meta)))
}
