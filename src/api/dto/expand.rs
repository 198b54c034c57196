//! DTO for the expansion endpoint.

use serde::Serialize;

/// A resolved short code.
#[derive(Debug, Serialize)]
pub struct ExpandResponse {
    pub code: String,
    pub long_url: String,
}
