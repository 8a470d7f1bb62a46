//! # Links Checker
//!
//! A service that accepts batches of URLs, probes each for reachability,
//! persists batch state and renders reports. Built with Axum and Tokio.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Batch aggregate, state machine and traits
//! - **Application Layer** ([`application`]) - Batch workflow and reporting services
//! - **Infrastructure Layer** ([`infrastructure`]) - File store, HTTP prober, report renderer
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Bounded-concurrency link checking with cancellation
//! - Crash-safe JSON store (write temp file, then rename)
//! - Monotonic batch IDs that survive restarts
//! - Plain-text reports over any set of batches
//!
//! ## Quick Start
//!
//! ```bash
//! export STATE_PATH="data/state.json"   # Optional
//! export MAX_WORKERS=5                  # Optional
//!
//! cargo run
//!
//! curl -X POST localhost:8080/api/links \
//!      -H 'content-type: application/json' \
//!      -d '{"links_list": ["https://example.com"]}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinksService, ReportService};
    pub use crate::domain::entities::{BatchId, BatchStatus, Link, LinkBatch, LinkResult, LinkStatus};
    pub use crate::domain::repositories::BatchRepository;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
