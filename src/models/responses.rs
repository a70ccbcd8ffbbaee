//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies. Statistics are
//! returned as `CacheStats` directly.

use serde::Serialize;
use serde_json::Value;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
    /// Milliseconds until the entry expires
    pub ttl_remaining_ms: u64,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value, ttl_remaining_ms: u64) -> Self {
        Self {
            key: key.into(),
            value,
            ttl_remaining_ms,
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
    /// Dependency names now linked to the key
    pub dependencies: Vec<String>,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, dependencies: Vec<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
            dependencies,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(removed: usize) -> Self {
        Self { removed }
    }
}

/// Response body for POST /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
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
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("students:1", json!({"name": "Ada"}), 1_500);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["key"], "students:1");
        assert_eq!(value["value"]["name"], "Ada");
        assert_eq!(value["ttl_remaining_ms"], 1_500);
    }

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("report:5", vec!["student:5".to_string()]);
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value["message"].as_str().unwrap().contains("successfully"));
        assert_eq!(value["dependencies"], json!(["student:5"]));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key");
        let body = serde_json::to_string(&resp).unwrap();
        assert!(body.contains("deleted_key"));
        assert!(body.contains("deleted"));
    }

    #[test]
    fn test_invalidate_response_serialize() {
        let value = serde_json::to_value(InvalidateResponse::new(3)).unwrap();
        assert_eq!(value, json!({"removed": 3}));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let body = serde_json::to_string(&resp).unwrap();
        assert!(body.contains("healthy"));
        assert!(body.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({"error": "Something went wrong"}));
    }
}
