//! In-process cache with idle-time expiry.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::StorageError;
use crate::domain::repositories::UrlStorage;

/// Snapshot of a single cached mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    /// Refreshed on every successful read; drives expiry.
    pub last_accessed_at: Instant,
}

#[derive(Debug)]
struct Slot {
    value: String,
    last_accessed_at: Instant,
    seq: u64,
}

/// Entries plus a recency index keyed by access sequence number.
///
/// Every get/insert stamps the entry with the next sequence number under the
/// lock, so ascending `seq` is also ascending `last_accessed_at`.
#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Slot>,
    recency: BTreeMap<u64, String>,
    next_seq: u64,
}

impl Inner {
    fn stamp(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// Create-only key-value cache whose entries expire after a period of
/// inactivity.
///
/// A single mutex serializes [`get`](Self::get), [`insert`](Self::insert) and
/// [`sweep`](Self::sweep). The sweep walks the recency index from the least
/// recently used end and stops at the first live entry, so its cost is
/// proportional to the number of expired entries rather than the map size.
#[derive(Debug, Default)]
pub struct ExpiringCache {
    inner: Mutex<Inner>,
}

impl ExpiringCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` and refreshes its last access time.
    ///
    /// A miss leaves the cache untouched.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let slot = inner.entries.get_mut(key)?;
        inner.recency.remove(&slot.seq);

        slot.seq = inner.next_seq;
        slot.last_accessed_at = Instant::now();
        inner.next_seq += 1;
        inner.recency.insert(slot.seq, key.to_owned());

        Some(slot.value.clone())
    }

    /// Stores `key → value` with `last_accessed_at = now`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] if `key` is already cached; the
    /// existing entry is not modified.
    pub fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(key) {
            return Err(StorageError::AlreadyExists);
        }

        let seq = inner.stamp();
        inner.recency.insert(seq, key.to_owned());
        inner.entries.insert(
            key.to_owned(),
            Slot {
                value: value.to_owned(),
                last_accessed_at: Instant::now(),
                seq,
            },
        );

        Ok(())
    }

    /// Removes every entry idle for strictly longer than `max_idle`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self, max_idle: Duration) -> usize {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();
        let mut removed = 0;

        while let Some(oldest) = inner.recency.first_entry() {
            let expired = inner.entries.get(oldest.get()).is_none_or(|slot| {
                now.saturating_duration_since(slot.last_accessed_at) > max_idle
            });

            if !expired {
                break;
            }

            let key = oldest.remove();
            if inner.entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, remaining = inner.entries.len(), "Cache sweep");
        }

        removed
    }

    /// Reads an entry without refreshing it.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        let inner = self.inner.lock();

        inner.entries.get(key).map(|slot| CacheEntry {
            key: key.to_owned(),
            value: slot.value.clone(),
            last_accessed_at: slot.last_accessed_at,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

/// Memory-only storage mode: the cache is the only tier.
///
/// No sweeper runs in this mode, so entries live for the process lifetime.
#[async_trait]
impl UrlStorage for ExpiringCache {
    async fn get(&self, key: &str) -> Result<String, StorageError> {
        ExpiringCache::get(self, key).ok_or(StorageError::NotFound)
    }

    async fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        ExpiringCache::insert(self, key, value)
    }

    fn kind(&self) -> &'static str {
        "memory"
    }

    fn cached_entries(&self) -> usize {
        self.len()
    }
}
