//! Domain layer containing business entities and logic.
//!
//! This module holds the batch aggregate and the contracts the rest of the
//! service is built against. It performs no I/O.
//!
//! # Architecture
//!
//! - [`entities`] - Batch aggregate, links and results
//! - [`repositories`] - Batch storage trait
//! - [`checker`] - Batch checker and single-link prober traits
//! - [`report`] - Report generator trait
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Workflow lives in services (see [`crate::application::services`])
//!
//! # Batch Processing Flow
//!
//! 1. [`crate::application::services::LinksService`] allocates an ID and builds a batch
//! 2. The batch is saved as `created`, started, and saved as `in_progress`
//! 3. A [`checker::Checker`] probes every link and saves the final state
//! 4. The stored copy is reloaded and returned to the caller

pub mod checker;
pub mod entities;
pub mod report;
pub mod repositories;
