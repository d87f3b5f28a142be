//! Errors surfaced by the raw HTTP boundary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, reset)
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not valid JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
