//! Batch repository implementations.
//!
//! # Repositories
//!
//! - [`FileBatchRepository`] - In-memory map mirrored to an atomically replaced JSON file

pub mod file_batch_repository;

pub use file_batch_repository::FileBatchRepository;
