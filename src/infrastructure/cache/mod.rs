//! In-process caching layer for fast expansions.
//!
//! - [`ExpiringCache`] - create-only map with idle-time expiry
//! - [`spawn_sweeper`] - cancellable background eviction task

mod expiring_cache;
mod sweeper;

pub use expiring_cache::{CacheEntry, ExpiringCache};
pub use sweeper::spawn_sweeper;
