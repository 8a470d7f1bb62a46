//! DTOs for the batch creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{BatchId, BatchStatus, LinkBatch, LinkResult, LinkStatus};

/// Request to check a list of URLs as one batch.
///
/// Emptiness is checked by the batch itself so the client sees the same
/// message as every other caller.
#[derive(Debug, Deserialize, Validate)]
pub struct LinksRequest {
    #[validate(length(max = 1000, message = "links_list must not exceed 1000 urls"))]
    pub links_list: Vec<String>,
}

/// Checked batch returned to the client.
#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub links_num: BatchId,
    pub status: BatchStatus,
    pub results: Vec<LinkResultItem>,
}

/// Outcome for one URL.
#[derive(Debug, Serialize)]
pub struct LinkResultItem {
    pub url: String,
    pub status: LinkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&LinkResult> for LinkResultItem {
    fn from(result: &LinkResult) -> Self {
        Self {
            url: result.link.url.clone(),
            status: result.status,
            error: result.error.clone(),
        }
    }
}

impl From<&LinkBatch> for LinksResponse {
    fn from(batch: &LinkBatch) -> Self {
        Self {
            links_num: batch.id(),
            status: batch.status(),
            results: batch.results().iter().map(LinkResultItem::from).collect(),
        }
    }
}
