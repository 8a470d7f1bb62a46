//! DTOs for the report endpoint.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::BatchId;

/// Request to render a report over several batches.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, max = 1000, message = "links_num must contain between 1 and 1000 ids"))]
    pub links_num: Vec<BatchId>,
}
