//! Report rendering seam.

use crate::domain::entities::LinkBatch;
use crate::error::AppError;

/// Renders a set of batches into a downloadable document.
#[cfg_attr(test, mockall::automock)]
pub trait ReportGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if rendering fails.
    fn generate_report(&self, batches: &[LinkBatch]) -> Result<Vec<u8>, AppError>;

    /// MIME type of the rendered document.
    fn content_type(&self) -> &'static str;

    /// Suggested file name for downloads.
    fn file_name(&self) -> &'static str;
}
