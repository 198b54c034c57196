//! Shortening and expansion service.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::StorageError;
use crate::domain::repositories::UrlStorage;
use crate::utils::code_generator::{SLOT_COUNT, candidates, fingerprint};

/// Failures surfaced by [`ShortenerService`].
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("url is empty")]
    EmptyInput,

    #[error("short code not found")]
    NotFound,

    #[error("short code already exists")]
    AlreadyExists,

    #[error("all {slots} collision slots are taken for fingerprint {fingerprint}")]
    ExhaustedKeyspace { fingerprint: String, slots: usize },

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ShortenError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => Self::NotFound,
            StorageError::AlreadyExists => Self::AlreadyExists,
            other => Self::Storage(other),
        }
    }
}

/// Maps long URLs to deterministic short codes and back.
///
/// Runs against whichever [`UrlStorage`] was selected at startup.
pub struct ShortenerService {
    storage: Arc<dyn UrlStorage>,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(storage: Arc<dyn UrlStorage>) -> Self {
        Self { storage }
    }

    /// Returns the short code for `long_url`, creating it if needed.
    ///
    /// # Collision Resolution
    ///
    /// Candidates are probed in slot order (see
    /// [`crate::utils::code_generator::candidates`]):
    ///
    /// - free slot: claim it with an insert and return it
    /// - slot already bound to `long_url`: return it without inserting
    /// - slot bound to another URL: try the next slot
    ///
    /// # Errors
    ///
    /// Returns [`ShortenError::EmptyInput`] for an empty URL.
    /// Returns [`ShortenError::AlreadyExists`] if a concurrent writer claimed
    /// the free slot between the probe and the insert.
    /// Returns [`ShortenError::ExhaustedKeyspace`] if every slot is taken.
    /// Returns [`ShortenError::Storage`] on transport failures.
    pub async fn shorten(&self, long_url: &str) -> Result<String, ShortenError> {
        if long_url.is_empty() {
            return Err(ShortenError::EmptyInput);
        }

        for candidate in candidates(long_url) {
            match self.storage.get(&candidate).await {
                Err(StorageError::NotFound) => {
                    self.storage.insert(&candidate, long_url).await?;
                    info!(code = %candidate, "Short code created");
                    return Ok(candidate);
                }
                Ok(existing) if existing == long_url => {
                    debug!(code = %candidate, "URL already shortened");
                    return Ok(candidate);
                }
                Ok(_) => {
                    debug!(code = %candidate, "Slot taken by another URL, probing next");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let fingerprint = fingerprint(long_url);
        metrics::counter!("shortener_keyspace_exhausted_total").increment(1);
        error!(
            %fingerprint,
            slots = SLOT_COUNT,
            "Collision keyspace exhausted; input may be adversarial"
        );

        Err(ShortenError::ExhaustedKeyspace {
            fingerprint,
            slots: SLOT_COUNT,
        })
    }

    /// Resolves a short code to its long URL.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenError::EmptyInput`] for an empty code.
    /// Returns [`ShortenError::NotFound`] if the code is unknown.
    /// Returns [`ShortenError::Storage`] on transport failures.
    pub async fn expand(&self, code: &str) -> Result<String, ShortenError> {
        if code.is_empty() {
            return Err(ShortenError::EmptyInput);
        }

        Ok(self.storage.get(code).await?)
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    /// Name of the active storage mode.
    pub fn storage_kind(&self) -> &'static str {
        self.storage.kind()
    }

    /// Entries currently held by the cache tier.
    pub fn cached_entries(&self) -> usize {
        self.storage.cached_entries()
    }
}
