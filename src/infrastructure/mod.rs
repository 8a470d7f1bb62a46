//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for storage, link probing and report rendering.
//!
//! # Modules
//!
//! - [`checker`] - Bounded-concurrency batch checker and the HTTP prober
//! - [`persistence`] - File-backed batch repository
//! - [`report`] - Plain-text report generator

pub mod checker;
pub mod persistence;
pub mod report;
