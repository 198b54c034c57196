#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use url_shortener::application::services::ShortenerService;
use url_shortener::domain::StorageError;
use url_shortener::domain::repositories::{UrlRepository, UrlStorage};
use url_shortener::infrastructure::cache::ExpiringCache;
use url_shortener::infrastructure::storage::TieredStorage;
use url_shortener::state::AppState;

pub const BASE_URL: &str = "http://s.test";

/// Durable store backed by a map, counting every call.
#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<HashMap<String, String>>,
    offline: AtomicBool,
    pub gets: AtomicUsize,
    pub inserts: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Writes a row directly, bypassing the counters.
    pub fn seed(&self, key: &str, value: &str) {
        self.rows.lock().insert(key.to_string(), value.to_string());
    }

    pub fn row(&self, key: &str) -> Option<String> {
        self.rows.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Makes every subsequent call fail with a backend error.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UrlRepository for InMemoryRepository {
    async fn get_by_key(&self, key: &str) -> Result<String, StorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        self.rows.lock().get(key).cloned().ok_or(StorageError::NotFound)
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut rows = self.rows.lock();
        if rows.contains_key(key) {
            return Err(StorageError::AlreadyExists);
        }
        rows.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Tiered storage over a fresh cache and the given durable fake.
pub fn tiered(repo: Arc<InMemoryRepository>) -> (Arc<TieredStorage>, Arc<ExpiringCache>) {
    let cache = Arc::new(ExpiringCache::new());
    let storage = Arc::new(TieredStorage::new(cache.clone(), repo));
    (storage, cache)
}

pub fn create_test_state(storage: Arc<dyn UrlStorage>) -> AppState {
    AppState::new(Arc::new(ShortenerService::new(storage)), BASE_URL)
}

/// Tiered state plus handles to both tiers.
pub fn create_tiered_state() -> (AppState, Arc<InMemoryRepository>, Arc<ExpiringCache>) {
    let repo = InMemoryRepository::new();
    let (storage, cache) = tiered(repo.clone());
    (create_test_state(storage), repo, cache)
}
