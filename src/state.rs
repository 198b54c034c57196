use std::sync::Arc;

use crate::application::services::ShortenerService;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    /// Prefix for the short URLs returned by `POST /api/shorten`.
    pub base_url: String,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService>, base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: base_url.into(),
        }
    }
}
