//! Request bodies and query strings sent to the trail backend.

use serde::{Deserialize, Serialize};
use trailhunt_domain::SessionContext;

/// Query string identifying the session on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailQuery {
    pub user_id: String,
    pub trail_ref: String,
}

impl TrailQuery {
    pub fn from_session(session: &SessionContext) -> Self {
        Self {
            user_id: session.user_id().to_string(),
            trail_ref: session.trail_ref().to_string(),
        }
    }

    /// Key/value pairs in wire order.
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [("user_id", &self.user_id), ("trail_ref", &self.trail_ref)]
    }
}

/// Body of `POST /api/next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTaskRequest {
    pub user_id: String,
    pub trail_ref: String,
    /// Asks the backend for richer diagnostic payloads; game logic is unchanged
    pub debug: bool,
}

impl NextTaskRequest {
    pub fn from_session(session: &SessionContext, debug: bool) -> Self {
        Self {
            user_id: session.user_id().to_string(),
            trail_ref: session.trail_ref().to_string(),
            debug,
        }
    }
}

/// Body of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
    pub user_id: String,
    pub trail_ref: String,
}

impl ChatMessageRequest {
    pub fn from_session(session: &SessionContext, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: session.user_id().to_string(),
            trail_ref: session.trail_ref().to_string(),
        }
    }
}
