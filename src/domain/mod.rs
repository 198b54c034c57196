//! Domain layer: storage contracts and their error type.
//!
//! This layer has no dependencies on infrastructure or presentation layers.
//!
//! - [`repositories`] - Storage trait definitions
//! - [`errors`] - [`errors::StorageError`] shared by all tiers
//!
//! # Request Flow
//!
//! 1. Shortening probes candidates through [`repositories::UrlStorage::get`]
//!    and claims the first free one with [`repositories::UrlStorage::insert`]
//! 2. Expansion is a single [`repositories::UrlStorage::get`]
//! 3. In tiered mode both calls reach the durable
//!    [`repositories::UrlRepository`] only on a cache miss or a write

pub mod errors;
pub mod repositories;

pub use errors::StorageError;
