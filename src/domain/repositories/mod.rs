//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated via `mockall` for unit tests.
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod batch_repository;

pub use batch_repository::BatchRepository;

#[cfg(test)]
pub use batch_repository::MockBatchRepository;
