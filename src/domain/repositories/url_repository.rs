//! Storage contracts for short code → long URL mappings.

use crate::domain::errors::StorageError;
use async_trait::async_trait;

/// Durable, authoritative store of short code mappings.
///
/// Entries are created once and never updated or deleted, so any value read
/// back for a key is final.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Looks up the long URL stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no row exists for `key`.
    /// Returns [`StorageError::Timeout`] or [`StorageError::Backend`] on
    /// transport failures.
    async fn get_by_key(&self, key: &str) -> Result<String, StorageError>;

    /// Inserts `key → value` unless `key` is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if `key` is already present;
    /// the stored value is left unchanged.
    /// Returns [`StorageError::Timeout`] or [`StorageError::Backend`] on
    /// transport failures.
    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Key-value capability consumed by the shortener service.
///
/// Selected once at startup: either the in-memory cache on its own or the
/// tiered coordinator in front of a [`UrlRepository`].
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::ExpiringCache`] - memory-only mode
/// - [`crate::infrastructure::storage::TieredStorage`] - cache + durable store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStorage: Send + Sync {
    /// Resolves `key` to its long URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the key is unknown, or a
    /// transport error from the backing store.
    async fn get(&self, key: &str) -> Result<String, StorageError>;

    /// Binds `key` to `value`. Never overwrites.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if `key` is already bound, or a
    /// transport error from the backing store.
    async fn insert(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Short name of the storage mode, reported by the health endpoint.
    fn kind(&self) -> &'static str;

    /// Number of entries currently held in the in-process cache tier.
    fn cached_entries(&self) -> usize;
}
