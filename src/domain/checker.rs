//! Checking seams: the batch-level [`Checker`] and the per-link [`Prober`].

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::{LinkBatch, LinkStatus};
use crate::error::AppError;

/// Checks every link of a batch and persists the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Checker: Send + Sync {
    /// Probes all links, records each outcome on `batch` and saves it.
    ///
    /// Does not return before every started probe has finished. Cancelling
    /// `cancel` aborts in-flight probes and skips the ones not started yet.
    ///
    /// # Errors
    ///
    /// Only persistence errors surface; probe failures are recorded on the
    /// batch.
    async fn check_batch(
        &self,
        batch: &mut LinkBatch,
        cancel: CancellationToken,
    ) -> Result<(), AppError>;
}

/// Result of one reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: LinkStatus,
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn available() -> Self {
        Self {
            status: LinkStatus::Available,
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            status: LinkStatus::Unavailable,
            error: Some(error.into()),
        }
    }
}

/// Performs a single reachability probe against one URL.
///
/// Never fails: every problem is classified into the returned outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
