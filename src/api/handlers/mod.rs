//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod batches;
pub mod health;
pub mod links;
pub mod report;

pub use batches::{get_batch_handler, list_batches_handler};
pub use health::health_handler;
pub use links::create_batch_handler;
pub use report::report_handler;
