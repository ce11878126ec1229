//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies. The stats endpoint
//! serializes `cache::CacheReport` directly.

use serde::Serialize;

/// Response body for POST /cache/:category/invalidate
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Whether an entry existed and was removed
    pub removed: bool,
    /// Namespace the entry lived in
    pub category: String,
    /// Derived cache key
    pub key: String,
}

impl InvalidateResponse {
    pub fn new(removed: bool, category: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            removed,
            category: category.into(),
            key: key.into(),
        }
    }
}

/// Response body for DELETE /cache and DELETE /cache/:category
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: u64,
    /// Namespace cleared, absent when every category was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ClearResponse {
    /// Creates a ClearResponse for one namespace
    pub fn for_category(removed: u64, category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            message: format!("Cleared {} entries from '{}'", removed, category),
            removed,
            category: Some(category),
        }
    }

    /// Creates a ClearResponse for every namespace
    pub fn all(removed: u64) -> Self {
        Self {
            message: format!("Cleared {} entries", removed),
            removed,
            category: None,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status; the server is healthy even with the cache degraded
    pub status: String,
    /// Whether the backing store answered the startup probe
    pub cache_enabled: bool,
    /// Backing store provider name
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_enabled: bool, backend: impl Into<String>) -> Self {
        Self {
            status: if cache_enabled { "healthy" } else { "degraded" }.to_string(),
            cache_enabled,
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_response_for_category() {
        let resp = ClearResponse::for_category(3, "csv");
        assert_eq!(resp.removed, 3);
        assert_eq!(resp.category.as_deref(), Some("csv"));
        assert!(resp.message.contains("csv"));
    }

    #[test]
    fn test_clear_response_all_omits_category() {
        let json = serde_json::to_value(ClearResponse::all(7)).unwrap();
        assert_eq!(json["removed"], 7);
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_health_response_status() {
        assert_eq!(HealthResponse::healthy(true, "redis").status, "healthy");

        let degraded = HealthResponse::healthy(false, "disabled");
        assert_eq!(degraded.status, "degraded");
        assert!(!degraded.cache_enabled);
        assert!(!degraded.timestamp.is_empty());
    }

    #[test]
    fn test_error_response() {
        let resp = ErrorResponse::new("Something went wrong");
        assert_eq!(resp.error, "Something went wrong");
    }
}
