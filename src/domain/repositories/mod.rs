//! Repository trait definitions for the domain layer.
//!
//! Two seams are defined here:
//!
//! - [`UrlRepository`] - the durable store contract (get / insert-if-absent)
//! - [`UrlStorage`] - the storage capability the shortener runs against,
//!   implemented by both the memory-only cache and the tiered coordinator
//!
//! Implementations live in `crate::infrastructure`. Mock implementations are
//! auto-generated via `mockall` for unit tests.

pub mod url_repository;

pub use url_repository::{UrlRepository, UrlStorage};

#[cfg(test)]
pub use url_repository::{MockUrlRepository, MockUrlStorage};
