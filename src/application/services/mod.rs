//! Business logic services for the application layer.

pub mod links_service;
pub mod report_service;

pub use links_service::LinksService;
pub use report_service::{Report, ReportService};
