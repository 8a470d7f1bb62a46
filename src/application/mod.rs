//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository,
//! checker and report generator calls. Services consume domain traits and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::links_service::LinksService`] - Batch creation, checking and lookup
//! - [`services::report_service::ReportService`] - Report rendering over stored batches

pub mod services;
