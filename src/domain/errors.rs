//! Error type shared by every storage tier.

use std::time::Duration;
use thiserror::Error;

/// Outcome of a failed storage operation.
///
/// `NotFound` and `AlreadyExists` are expected control-flow signals: the
/// tiered coordinator falls back on the first and the code generator probes
/// past the second. `Timeout` and `Backend` are transport failures that are
/// always propagated to the caller unchanged.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key not found")]
    NotFound,

    #[error("key already exists")]
    AlreadyExists,

    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns true for failures of the backing store itself rather than
    /// key-level outcomes.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Backend(_))
    }
}
