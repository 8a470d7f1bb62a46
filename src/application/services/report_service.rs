//! Report generation over stored batches.

use std::sync::Arc;

use crate::domain::entities::BatchId;
use crate::domain::report::ReportGenerator;
use crate::domain::repositories::BatchRepository;
use crate::error::AppError;

/// A rendered report ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: &'static str,
}

/// Service for rendering reports over a set of batches.
pub struct ReportService<R: BatchRepository, G: ReportGenerator> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R: BatchRepository, G: ReportGenerator> ReportService<R, G> {
    /// Creates a new report service.
    pub fn new(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Loads the batches for `ids` and renders them in request order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `ids` is empty.
    /// Returns [`AppError::NotFound`] if any ID is unknown; nothing is rendered.
    /// Returns [`AppError::Internal`] if rendering fails.
    pub async fn generate_report_for_batches(&self, ids: &[BatchId]) -> Result<Report, AppError> {
        if ids.is_empty() {
            return Err(AppError::bad_request(
                "links_num must not be empty",
                serde_json::json!({}),
            ));
        }

        let batches = self.repository.get_batches(ids).await?;
        let bytes = self.generator.generate_report(&batches)?;
        tracing::info!(batches = batches.len(), bytes = bytes.len(), "Report generated");

        Ok(Report {
            bytes,
            content_type: self.generator.content_type(),
            file_name: self.generator.file_name(),
        })
    }
}
