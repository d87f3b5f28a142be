//! Application error types.

use thiserror::Error;
use trailhunt_domain::DomainError;

use crate::application::navigation::NavigationError;
use crate::application::proximity::ProximityError;
use crate::application::router::RouteError;
use crate::ports::outbound::GatewayError;

/// Errors surfaced by the trail engine to the presentation layer.
///
/// Transport and timeout failures are retryable by an explicit player action.
/// Protocol and routing failures are fatal to the step and must be shown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrailError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("No screen registered for task type {tag:?}")]
    UnroutableTask { tag: String },
    #[error("Position unavailable")]
    NoPosition,
    #[error("Invalid session: {0}")]
    InvalidSession(#[from] DomainError),
    #[error("Invalid navigation query: {0}")]
    InvalidQuery(String),
    #[error("No reward awaiting acknowledgement")]
    NothingToAcknowledge,
}

impl TrailError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrailError::Transport(_) | TrailError::Timeout { .. })
    }
}

impl From<GatewayError> for TrailError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(msg) => TrailError::Transport(msg),
            GatewayError::Timeout {
                operation,
                timeout_ms,
            } => TrailError::Timeout {
                operation,
                timeout_ms,
            },
            GatewayError::Protocol(msg) => TrailError::Protocol(msg),
            GatewayError::UnroutableTask { tag } => TrailError::UnroutableTask { tag },
        }
    }
}

impl From<RouteError> for TrailError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::Unroutable { tag } => TrailError::UnroutableTask { tag },
        }
    }
}

impl From<ProximityError> for TrailError {
    fn from(err: ProximityError) -> Self {
        match err {
            ProximityError::NoPosition => TrailError::NoPosition,
            ProximityError::NoTarget => {
                TrailError::Protocol("map task has no target position".to_string())
            }
        }
    }
}

impl From<NavigationError> for TrailError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::Session(err) => TrailError::InvalidSession(err),
            NavigationError::UnroutableTask { tag } => TrailError::UnroutableTask { tag },
            other => TrailError::InvalidQuery(other.to_string()),
        }
    }
}

/// Default request timeout in milliseconds (15 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_keep_their_cause() {
        let timeout: TrailError = GatewayError::Timeout {
            operation: "fetch_next",
            timeout_ms: 50,
        }
        .into();
        let transport: TrailError = GatewayError::Transport("refused".into()).into();

        assert!(matches!(timeout, TrailError::Timeout { .. }));
        assert!(matches!(transport, TrailError::Transport(_)));
        assert_ne!(timeout, transport);
        assert!(timeout.is_retryable());
        assert!(transport.is_retryable());
    }

    #[test]
    fn test_fatal_errors_are_not_retryable() {
        let unroutable: TrailError = RouteError::Unroutable {
            tag: "Puzzle".into(),
        }
        .into();
        assert_eq!(
            unroutable,
            TrailError::UnroutableTask {
                tag: "Puzzle".into()
            }
        );
        assert!(!unroutable.is_retryable());
        assert!(!TrailError::Protocol("missing task".into()).is_retryable());
        assert!(!TrailError::from(ProximityError::NoPosition).is_retryable());
    }

    #[test]
    fn test_unknown_task_in_query_is_unroutable() {
        let err: TrailError = NavigationError::UnroutableTask {
            tag: "Puzzle".into(),
        }
        .into();
        assert_eq!(
            err,
            TrailError::UnroutableTask {
                tag: "Puzzle".into()
            }
        );
        assert!(!err.is_retryable());
    }
}
