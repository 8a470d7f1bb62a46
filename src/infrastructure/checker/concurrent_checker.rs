//! Bounded-concurrency batch checker.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::domain::checker::{Checker, ProbeOutcome, Prober};
use crate::domain::entities::{LinkBatch, LinkStatus};
use crate::domain::repositories::BatchRepository;
use crate::error::AppError;

/// Worker budget used when none (or zero) is configured.
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Checks a batch by running one probe task per link, at most `max_workers`
/// at a time.
///
/// Probe tasks only compute outcomes; the checker itself is the single writer
/// of the batch and applies each outcome as its task is joined.
pub struct ConcurrentChecker<R: BatchRepository, P: Prober> {
    repository: Arc<R>,
    prober: Arc<P>,
    max_workers: usize,
}

impl<R: BatchRepository, P: Prober> ConcurrentChecker<R, P> {
    /// Creates a checker. A `max_workers` of zero falls back to
    /// [`DEFAULT_MAX_WORKERS`].
    pub fn new(repository: Arc<R>, prober: Arc<P>, max_workers: usize) -> Self {
        let max_workers = if max_workers == 0 {
            DEFAULT_MAX_WORKERS
        } else {
            max_workers
        };

        Self {
            repository,
            prober,
            max_workers,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

#[async_trait]
impl<R, P> Checker for ConcurrentChecker<R, P>
where
    R: BatchRepository + 'static,
    P: Prober + 'static,
{
    async fn check_batch(
        &self,
        batch: &mut LinkBatch,
        cancel: CancellationToken,
    ) -> Result<(), AppError> {
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks: JoinSet<(usize, ProbeOutcome)> = JoinSet::new();
        let mut task_links: HashMap<Id, usize> = HashMap::new();
        let urls: Vec<String> = batch.links().iter().map(|l| l.url.clone()).collect();

        tracing::info!(
            batch_id = batch.id(),
            links = urls.len(),
            max_workers = self.max_workers,
            "Checking batch"
        );

        for (index, url) in urls.into_iter().enumerate() {
            let acquired = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
            };
            let Some(permit) = acquired else {
                break;
            };

            let prober = Arc::clone(&self.prober);
            let cancel = cancel.clone();
            let handle = tasks.spawn(async move {
                let _permit = permit;
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => ProbeOutcome::unavailable("request cancelled"),
                    outcome = prober.probe(&url) => outcome,
                };
                tracing::debug!(url = %url, status = outcome.status.as_str(), "Probe finished");
                (index, outcome)
            });
            task_links.insert(handle.id(), index);

            while let Some(joined) = tasks.try_join_next_with_id() {
                record_probe(batch, &task_links, joined);
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            record_probe(batch, &task_links, joined);
        }

        let pending = batch.pending_count();
        if cancel.is_cancelled() && pending > 0 && !batch.status().is_terminal() {
            tracing::warn!(
                batch_id = batch.id(),
                pending,
                "Batch check cancelled before every link was probed"
            );
            batch.fail()?;
        }

        self.repository.save_batch(batch).await?;

        let available = batch
            .results()
            .iter()
            .filter(|r| r.status == LinkStatus::Available)
            .count();
        tracing::info!(
            batch_id = batch.id(),
            status = batch.status().as_str(),
            available,
            unavailable = batch.results().len() - available - pending,
            "Batch check finished"
        );

        Ok(())
    }
}

/// Applies one joined probe task to the batch. A panicked task marks its
/// link unavailable.
fn record_probe(
    batch: &mut LinkBatch,
    task_links: &HashMap<Id, usize>,
    joined: Result<(Id, (usize, ProbeOutcome)), JoinError>,
) {
    match joined {
        Ok((_, (index, outcome))) => {
            batch.record_result_at(index, outcome.status, outcome.error);
        }
        Err(e) => {
            if let Some(&index) = task_links.get(&e.id()) {
                tracing::error!(batch_id = batch.id(), index, error = %e, "Probe task failed");
                batch.record_result_at(
                    index,
                    LinkStatus::Unavailable,
                    Some(format!("probe task failed: {e}")),
                );
            }
        }
    }
}
