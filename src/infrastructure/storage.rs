//! Two-tier storage: expiring cache in front of the durable repository.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::StorageError;
use crate::domain::repositories::{UrlRepository, UrlStorage};
use crate::infrastructure::cache::ExpiringCache;

/// Coordinates reads and writes across the cache and the durable store.
///
/// # Read path (cache-aside)
///
/// 1. Cache hit: return immediately, no durable access
/// 2. Cache miss: query the durable store
///    - hit: populate the cache (best effort) and return
///    - `NotFound` or transport error: propagate, cache untouched
///
/// # Write path (write-through)
///
/// The durable store is written first. Only after it commits is the cache
/// populated, so the cache never holds a key the durable store lacks.
///
/// Cache population races (`AlreadyExists` from the cache) are absorbed;
/// durable failures never are.
pub struct TieredStorage {
    cache: Arc<ExpiringCache>,
    durable: Arc<dyn UrlRepository>,
}

impl TieredStorage {
    pub fn new(cache: Arc<ExpiringCache>, durable: Arc<dyn UrlRepository>) -> Self {
        Self { cache, durable }
    }

    /// Shared handle to the cache tier, for the sweeper.
    pub fn cache(&self) -> &Arc<ExpiringCache> {
        &self.cache
    }

    fn populate(&self, key: &str, value: &str) {
        match self.cache.insert(key, value) {
            Ok(()) => {}
            Err(StorageError::AlreadyExists) => {
                debug!(key, "Cache already populated by a concurrent request");
            }
            Err(e) => warn!(key, error = %e, "Cache population failed"),
        }
    }
}

#[async_trait]
impl UrlStorage for TieredStorage {
    async fn get(&self, key: &str) -> Result<String, StorageError> {
        if let Some(value) = self.cache.get(key) {
            metrics::counter!("cache_lookups_total", "result" => "hit").increment(1);
            debug!(key, "Cache HIT");
            return Ok(value);
        }

        metrics::counter!("cache_lookups_total", "result" => "miss").increment(1);
        debug!(key, "Cache MISS");

        let value = self.durable.get_by_key(key).await?;
        self.populate(key, &value);

        Ok(value)
    }

    async fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.durable.insert_if_absent(key, value).await?;
        self.populate(key, value);

        Ok(())
    }

    fn kind(&self) -> &'static str {
        "tiered"
    }

    fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;

    fn tiered(durable: MockUrlRepository) -> (TieredStorage, Arc<ExpiringCache>) {
        let cache = Arc::new(ExpiringCache::new());
        (TieredStorage::new(cache.clone(), Arc::new(durable)), cache)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_durable() {
        let mut durable = MockUrlRepository::new();
        durable.expect_get_by_key().times(0);

        let (storage, cache) = tiered(durable);
        cache.insert("code", "https://example.com").unwrap();

        let value = storage.get("code").await.unwrap();

        assert_eq!(value, "https://example.com");
    }

    #[tokio::test]
    async fn test_cache_miss_reads_through_and_populates() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_get_by_key()
            .withf(|key| key == "code")
            .times(1)
            .returning(|_| Ok("https://example.com".to_string()));

        let (storage, cache) = tiered(durable);

        assert_eq!(storage.get("code").await.unwrap(), "https://example.com");
        assert_eq!(storage.get("code").await.unwrap(), "https://example.com");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_durable_not_found_propagates() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_get_by_key()
            .times(1)
            .returning(|_| Err(StorageError::NotFound));

        let (storage, cache) = tiered(durable);

        let result = storage.get("missing").await;

        assert!(matches!(result, Err(StorageError::NotFound)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_durable_transport_error_propagates_without_cache_mutation() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_get_by_key()
            .times(1)
            .returning(|_| Err(StorageError::Backend("connection refused".into())));

        let (storage, cache) = tiered(durable);

        let result = storage.get("code").await;

        assert!(matches!(result, Err(StorageError::Backend(_))));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_insert_writes_durable_then_cache() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_insert_if_absent()
            .withf(|key, value| key == "code" && value == "https://example.com")
            .times(1)
            .returning(|_, _| Ok(()));
        durable.expect_get_by_key().times(0);

        let (storage, cache) = tiered(durable);

        storage.insert("code", "https://example.com").await.unwrap();

        assert_eq!(cache.get("code").as_deref(), Some("https://example.com"));
        assert_eq!(storage.get("code").await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_insert_durable_conflict_leaves_cache_untouched() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_insert_if_absent()
            .times(1)
            .returning(|_, _| Err(StorageError::AlreadyExists));

        let (storage, cache) = tiered(durable);

        let result = storage.insert("code", "https://example.com").await;

        assert!(matches!(result, Err(StorageError::AlreadyExists)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_insert_durable_failure_leaves_cache_untouched() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_insert_if_absent()
            .times(1)
            .returning(|_, _| Err(StorageError::Timeout(std::time::Duration::from_secs(5))));

        let (storage, cache) = tiered(durable);

        let result = storage.insert("code", "https://example.com").await;

        assert!(matches!(result, Err(StorageError::Timeout(_))));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_insert_swallows_cache_population_race() {
        let mut durable = MockUrlRepository::new();
        durable
            .expect_insert_if_absent()
            .times(1)
            .returning(|_, _| Ok(()));

        let (storage, cache) = tiered(durable);
        cache.insert("code", "https://example.com").unwrap();

        let result = storage.insert("code", "https://example.com").await;

        assert!(result.is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_reports_tiered_kind() {
        let (storage, _cache) = tiered(MockUrlRepository::new());
        assert_eq!(storage.kind(), "tiered");
        assert_eq!(storage.cached_entries(), 0);
    }
}
