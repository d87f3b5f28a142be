//! Unified error types for the domain layer
//!
//! Domain errors describe caller mistakes (missing identity, malformed
//! coordinates, unknown tags). They are never retryable.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., blank user id)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for invariant violations.
    ///
    /// Use this when a value cannot be constructed because a required field
    /// is empty or out of range:
    ///
    /// ```ignore
    /// if user_id.trim().is_empty() {
    ///     return Err(DomainError::validation("user_id is required"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("user_id is required");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: user_id is required");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown task type: Puzzle");
        assert!(matches!(err, DomainError::Parse(_)));
        assert!(err.to_string().contains("Puzzle"));
    }
}
