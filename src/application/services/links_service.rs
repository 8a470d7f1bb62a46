//! Batch creation and checking workflow.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::checker::Checker;
use crate::domain::entities::{BatchId, LinkBatch};
use crate::domain::repositories::BatchRepository;
use crate::error::AppError;

/// Service that turns a list of URLs into a checked, persisted batch.
pub struct LinksService<R: BatchRepository, C: Checker> {
    repository: Arc<R>,
    checker: Arc<C>,
    batch_deadline: Option<Duration>,
}

impl<R: BatchRepository, C: Checker> LinksService<R, C> {
    /// Creates a new links service without an overall batch deadline.
    pub fn new(repository: Arc<R>, checker: Arc<C>) -> Self {
        Self {
            repository,
            checker,
            batch_deadline: None,
        }
    }

    /// Cancels the check of a batch once `deadline` has elapsed; the batch
    /// then ends `failed` unless every probe had already completed.
    pub fn with_batch_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.batch_deadline = deadline;
        self
    }

    /// Creates a batch from `urls`, checks every link and returns the stored copy.
    ///
    /// # Flow
    ///
    /// 1. Reject empty or blank-only input (no ID is consumed)
    /// 2. Allocate an ID and save the batch as `created`
    /// 3. Start processing and save as `in_progress`
    /// 4. Run the checker, which saves the final state
    /// 5. Reload the batch from the repository
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for empty or blank-only input.
    /// Returns [`AppError::Persistence`] if any save fails.
    pub async fn create_and_check_batch(
        &self,
        urls: &[String],
        cancel: CancellationToken,
    ) -> Result<LinkBatch, AppError> {
        let links = LinkBatch::parse_links(urls)?;

        let id = self.repository.next_batch_id().await?;
        let mut batch = LinkBatch::from_links(id, links);
        self.repository.save_batch(&batch).await?;
        tracing::info!(batch_id = id, links = batch.links().len(), "Batch created");

        batch.start_processing()?;
        self.repository.save_batch(&batch).await?;

        let token = cancel.child_token();
        let mut check = self.checker.check_batch(&mut batch, token.clone());
        let checked = match self.batch_deadline {
            Some(deadline) => tokio::select! {
                result = &mut check => result,
                _ = tokio::time::sleep(deadline) => {
                    tracing::warn!(batch_id = id, ?deadline, "Batch deadline reached, cancelling probes");
                    token.cancel();
                    check.await
                }
            },
            None => check.await,
        };
        checked?;

        self.repository.get_batch(id).await
    }

    /// Retrieves a single batch.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown ID.
    pub async fn get_batch(&self, id: BatchId) -> Result<LinkBatch, AppError> {
        self.repository.get_batch(id).await
    }

    /// Retrieves several batches, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if any ID is unknown.
    pub async fn get_batches(&self, ids: &[BatchId]) -> Result<Vec<LinkBatch>, AppError> {
        self.repository.get_batches(ids).await
    }

    /// Pages through stored batches in ID order.
    ///
    /// Returns the page and the total number of stored batches.
    pub async fn list_batches(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<LinkBatch>, usize), AppError> {
        self.repository.list_batches_page(offset, limit).await
    }
}
