//! Infrastructure layer for storage tiers.
//!
//! This layer implements the storage traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - In-process expiring cache and its sweeper
//! - [`persistence`] - PostgreSQL durable store
//! - [`storage`] - Tiered coordinator combining the two

pub mod cache;
pub mod persistence;
pub mod storage;
