//! DTOs for batch lookup endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{StringWithSeparator, formats::CommaSeparator, serde_as};

use super::links::LinkResultItem;
use super::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{BatchId, BatchStatus, LinkBatch};

/// Query for `GET /api/batches`.
///
/// `ids` is a comma-separated list (`?ids=1,2,3`); when absent, stored
/// batches are paged in ID order (`?page=2&page_size=50`).
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct BatchListQuery {
    #[serde_as(as = "StringWithSeparator::<CommaSeparator, BatchId>")]
    #[serde(default)]
    pub ids: Vec<BatchId>,

    /// Applies only when `ids` is empty.
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Full view of one stored batch.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub id: BatchId,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total: usize,
    pub pending: usize,
    pub results: Vec<LinkResultItem>,
}

impl From<&LinkBatch> for BatchResponse {
    fn from(batch: &LinkBatch) -> Self {
        Self {
            id: batch.id(),
            status: batch.status(),
            created_at: batch.created_at(),
            updated_at: batch.updated_at(),
            total: batch.links().len(),
            pending: batch.pending_count(),
            results: batch.results().iter().map(LinkResultItem::from).collect(),
        }
    }
}

/// Response for `GET /api/batches`.
#[derive(Debug, Serialize)]
pub struct BatchListResponse {
    pub total: usize,
    pub items: Vec<BatchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

impl From<Vec<LinkBatch>> for BatchListResponse {
    fn from(batches: Vec<LinkBatch>) -> Self {
        let items: Vec<BatchResponse> = batches.iter().map(BatchResponse::from).collect();
        Self {
            total: items.len(),
            items,
            pagination: None,
        }
    }
}

impl BatchListResponse {
    pub fn with_pagination(mut self, pagination: PaginationMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
