//! Trail Gateway Port - the typed request/response boundary to the backend
//!
//! Every operation either yields a well-formed result or a `GatewayError`.
//! An empty success is never used to signal failure: `NextStep { task: None }`
//! means the trail is complete, nothing else.

use thiserror::Error;
use trailhunt_domain::{InventoryItem, Marker, Outcome, SessionContext, Task};

use super::ApiError;

/// Result of asking for the next task.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStep {
    pub task: Option<Task>,
    pub outcome: Option<Outcome>,
}

/// Character reply to a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub message: String,
    pub items: Vec<InventoryItem>,
    pub energy: Option<i64>,
}

/// Gateway failures, split by cause so callers can choose a retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Network/DNS failure or a non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),
    /// The call did not settle before its deadline
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
    /// Well-formed response missing or mangling required fields
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// Task tag the player has no screen for
    #[error("No screen registered for task type {tag:?}")]
    UnroutableTask { tag: String },
}

impl GatewayError {
    /// Transport and timeout failures may succeed on an explicit retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport(_) | GatewayError::Timeout { .. }
        )
    }
}

impl From<ApiError> for GatewayError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RequestFailed(msg) => GatewayError::Transport(msg),
            ApiError::HttpStatus { status, body } => {
                GatewayError::Transport(format!("HTTP {}: {}", status, body))
            }
            ApiError::InvalidResponse(msg) => GatewayError::Protocol(msg),
        }
    }
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait::async_trait]
pub trait TrailGatewayPort: Send + Sync {
    /// Next task for the session, with the outcome of the previous answer.
    async fn fetch_next(
        &self,
        session: &SessionContext,
        debug: bool,
    ) -> Result<NextStep, GatewayError>;

    /// Markers for the session's map, replacing any previous set.
    async fn fetch_markers(&self, session: &SessionContext) -> Result<Vec<Marker>, GatewayError>;

    /// Send a chat message to the trail character.
    async fn post_chat_message(
        &self,
        session: &SessionContext,
        text: &str,
    ) -> Result<ChatReply, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        assert!(matches!(
            GatewayError::from(ApiError::RequestFailed("refused".into())),
            GatewayError::Transport(_)
        ));
        let status = GatewayError::from(ApiError::HttpStatus {
            status: 502,
            body: "bad gateway".into(),
        });
        assert_eq!(status.to_string(), "Transport error: HTTP 502: bad gateway");
        assert!(matches!(
            GatewayError::from(ApiError::InvalidResponse("eof".into())),
            GatewayError::Protocol(_)
        ));
    }

    #[test]
    fn test_retryable_split() {
        assert!(GatewayError::Transport("x".into()).is_retryable());
        assert!(GatewayError::Timeout {
            operation: "fetch_next",
            timeout_ms: 10
        }
        .is_retryable());
        assert!(!GatewayError::Protocol("x".into()).is_retryable());
        assert!(!GatewayError::UnroutableTask { tag: "Puzzle".into() }.is_retryable());
    }
}
