use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::application::services::{LinksService, ReportService};
use crate::infrastructure::checker::{ConcurrentChecker, HttpProber};
use crate::infrastructure::persistence::FileBatchRepository;
use crate::infrastructure::report::TextReportGenerator;

pub type BatchChecker = ConcurrentChecker<FileBatchRepository, HttpProber>;
pub type AppLinksService = LinksService<FileBatchRepository, BatchChecker>;
pub type AppReportService = ReportService<FileBatchRepository, TextReportGenerator>;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub links_service: Arc<AppLinksService>,
    pub report_service: Arc<AppReportService>,
    pub repository: Arc<FileBatchRepository>,
    /// Cancelled on shutdown; every batch check runs under a child token.
    pub shutdown: CancellationToken,
    /// Batch checks outliving their request; drained before the final flush.
    pub checks: TaskTracker,
}
