//! Handler for the report endpoint.

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::report::ReportRequest;
use crate::error::AppError;
use crate::state::AppState;

/// Renders a downloadable report over the requested batches.
///
/// # Endpoint
///
/// `POST /api/report`
///
/// # Request Body
///
/// ```json
/// { "links_num": [1, 2] }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `links_num` is empty.
/// Returns 404 Not Found if any batch is unknown; no partial report is produced.
pub async fn report_handler(
    State(state): State<AppState>,
    Json(payload): Json<ReportRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let report = state
        .report_service
        .generate_report_for_batches(&payload.links_num)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", report.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}
