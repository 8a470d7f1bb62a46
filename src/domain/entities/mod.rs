//! Core domain entities.
//!
//! - [`LinkBatch`] - the batch aggregate and its state machine
//! - [`Link`] / [`LinkResult`] - one URL and the outcome of checking it
//! - [`LinkStatus`] / [`BatchStatus`] - result and lifecycle states

pub mod batch;

pub use batch::{BatchId, BatchStatus, Link, LinkBatch, LinkResult, LinkStatus};
