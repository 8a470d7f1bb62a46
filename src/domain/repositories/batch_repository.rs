//! Repository trait for link batch storage.

use crate::domain::entities::{BatchId, LinkBatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable keyed store of batches with a monotonic ID allocator.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileBatchRepository`] - JSON file store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_file.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Allocates a fresh batch ID. IDs are strictly increasing and never
    /// handed out twice, including across restarts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the ID space is exhausted.
    async fn next_batch_id(&self) -> Result<BatchId, AppError>;

    /// Inserts or replaces a batch by ID and makes the whole store durable.
    ///
    /// Advances the ID watermark past `batch.id()` when needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the store could not be written;
    /// the stored state is then unchanged.
    async fn save_batch(&self, batch: &LinkBatch) -> Result<(), AppError>;

    /// Returns a copy of the stored batch.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown ID.
    async fn get_batch(&self, id: BatchId) -> Result<LinkBatch, AppError>;

    /// Returns the batches for `ids`, in request order.
    ///
    /// All-or-nothing: one unknown ID fails the whole call.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] naming the first missing ID.
    async fn get_batches(&self, ids: &[BatchId]) -> Result<Vec<LinkBatch>, AppError>;

    /// Returns up to `limit` batches in ID order, skipping the first
    /// `offset`, together with the total number of stored batches.
    ///
    /// # Errors
    ///
    /// Implementation-specific; the file store never fails here.
    async fn list_batches_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<LinkBatch>, usize), AppError>;

    /// Returns every stored batch ordered by ID.
    ///
    /// # Errors
    ///
    /// Implementation-specific; the file store never fails here.
    async fn list_batches(&self) -> Result<Vec<LinkBatch>, AppError>;
}
