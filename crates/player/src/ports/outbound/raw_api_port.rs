//! Raw API Port - Object-safe HTTP boundary
//!
//! `RawApiPort` moves JSON to and from the trail backend and nothing more. The
//! application layer's `TrailGateway` wraps it with typed requests, response
//! validation and the timeout guard.
//!
//! Paths are relative to the backend base URL and may carry a query string.

use serde_json::Value;

use super::ApiError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait::async_trait]
pub trait RawApiPort: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}
