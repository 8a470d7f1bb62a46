//! Plain-text report renderer.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::domain::entities::LinkBatch;
use crate::domain::report::ReportGenerator;
use crate::error::AppError;
use serde_json::json;

const URL_WIDTH: usize = 48;
const STATUS_WIDTH: usize = 12;

/// Renders batches as a fixed-width text document.
///
/// # Output Format
///
/// ```text
/// Links check report
/// Generated at: 2025-12-10T12:00:00+00:00
///
/// Batch ID: 1
/// Status: done
/// Created at: 2025-12-10T11:59:58+00:00
/// Updated at: 2025-12-10T11:59:59+00:00
///
/// URL                                              STATUS       ERROR
/// https://ok.test                                  available
/// https://missing.test                             unavailable  unexpected status code: 404
/// ```
pub struct TextReportGenerator {
    title: String,
    date_format: String,
}

impl TextReportGenerator {
    /// Creates a generator. `date_format` is a `chrono` strftime pattern.
    pub fn new(title: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date_format: date_format.into(),
        }
    }

    fn render(&self, batches: &[LinkBatch], generated_at: DateTime<Utc>) -> Result<String, std::fmt::Error> {
        let mut out = String::new();

        writeln!(out, "{}", self.title)?;
        writeln!(out, "Generated at: {}", generated_at.format(&self.date_format))?;

        for batch in batches {
            writeln!(out)?;
            writeln!(out, "Batch ID: {}", batch.id())?;
            writeln!(out, "Status: {}", batch.status().as_str())?;
            writeln!(out, "Created at: {}", batch.created_at().format(&self.date_format))?;
            writeln!(out, "Updated at: {}", batch.updated_at().format(&self.date_format))?;
            writeln!(out)?;
            writeln!(
                out,
                "{:<URL_WIDTH$} {:<STATUS_WIDTH$} ERROR",
                "URL", "STATUS"
            )?;

            for result in batch.results() {
                let line = format!(
                    "{:<URL_WIDTH$} {:<STATUS_WIDTH$} {}",
                    result.link.url,
                    result.status.as_str(),
                    result.error.as_deref().unwrap_or("")
                );
                writeln!(out, "{}", line.trim_end())?;
            }
        }

        Ok(out)
    }
}

impl Default for TextReportGenerator {
    fn default() -> Self {
        Self::new("Links check report", "%Y-%m-%dT%H:%M:%S%:z")
    }
}

impl ReportGenerator for TextReportGenerator {
    fn generate_report(&self, batches: &[LinkBatch]) -> Result<Vec<u8>, AppError> {
        self.render(batches, Utc::now())
            .map(String::into_bytes)
            .map_err(|e| {
                AppError::internal("Failed to render report", json!({ "reason": e.to_string() }))
            })
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self) -> &'static str {
        "report.txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LinkStatus;

    #[test]
    fn test_render_lists_every_result() {
        let mut batch = LinkBatch::new(3, &["https://ok.test", "https://missing.test"]).unwrap();
        batch.start_processing().unwrap();
        batch.record_result_at(0, LinkStatus::Available, None);
        batch.record_result_at(
            1,
            LinkStatus::Unavailable,
            Some("unexpected status code: 404".to_string()),
        );

        let generator = TextReportGenerator::new("Weekly links", "%Y-%m-%d");
        let report = String::from_utf8(generator.generate_report(&[batch]).unwrap()).unwrap();

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Weekly links");
        assert!(lines[1].starts_with("Generated at: "));
        assert!(report.contains("Batch ID: 3"));
        assert!(report.contains("Status: done"));
        assert!(
            lines
                .iter()
                .any(|l| l.starts_with("https://ok.test") && l.ends_with("available"))
        );
        assert!(lines.iter().any(|l| l.starts_with("https://missing.test")
            && l.contains("unavailable")
            && l.ends_with("unexpected status code: 404")));
    }

    #[test]
    fn test_render_empty_batch_list() {
        let generator = TextReportGenerator::default();
        let report = String::from_utf8(generator.generate_report(&[]).unwrap()).unwrap();

        assert_eq!(report.lines().count(), 2);
        assert_eq!(generator.content_type(), "text/plain; charset=utf-8");
    }
}
