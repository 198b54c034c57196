//! DTOs for the shortening endpoint.

use crate::error::ErrorInfo;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten one or more URLs.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 1000, message = "Between 1 and 1000 URLs per request"))]
    pub urls: Vec<UrlItem>,
}

/// Individual URL to be shortened.
///
/// The value is taken verbatim: no normalization, so `https://a.com` and
/// `https://a.com/` map to different codes.
#[derive(Debug, Deserialize, Serialize)]
pub struct UrlItem {
    pub url: String,
}

/// Response containing batch processing results.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Individual result for a URL in the batch.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    Success {
        long_url: String,
        code: String,
        short_url: String,
    },
    Error {
        long_url: String,
        error: ErrorInfo,
    },
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(n: usize) -> ShortenRequest {
        ShortenRequest {
            urls: (0..n)
                .map(|i| UrlItem {
                    url: format!("https://example.com/{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_batch_size_bounds() {
        assert!(request(0).validate().is_err());
        assert!(request(1).validate().is_ok());
        assert!(request(1000).validate().is_ok());
        assert!(request(1001).validate().is_err());
    }

    #[test]
    fn test_error_item_serializes_without_code() {
        let item = ShortenResultItem::Error {
            long_url: String::new(),
            error: ErrorInfo {
                code: "validation_error",
                message: "URL must not be empty".into(),
                details: serde_json::json!({}),
            },
        };

        let json = serde_json::to_value(&item).unwrap();

        assert!(json.get("code").is_none());
        assert_eq!(json["error"]["code"], "validation_error");
    }
}
