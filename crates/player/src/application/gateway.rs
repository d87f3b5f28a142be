//! Trail Gateway - typed requests to the trail backend over `RawApiPort`.
//!
//! Every call races a deadline. Whichever settles first wins; a late response
//! is dropped with the losing future and never touches engine state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use trailhunt_domain::{Marker, SessionContext};
use trailhunt_shared::{
    decode_task, ChatMessageRequest, ChatMessageResponse, MarkersResponse, NextTaskRequest,
    NextTaskResponse, TaskDecodeError, TrailQuery, DEFAULT_CHAT_PATH, MAP_PATH, NEXT_TASK_PATH,
};

use crate::ports::outbound::{ChatReply, GatewayError, NextStep, RawApiPort, TrailGatewayPort};

/// Gateway to the trail backend.
#[derive(Clone)]
pub struct TrailGateway {
    api: Arc<dyn RawApiPort>,
    chat_path: String,
    timeout_ms: u64,
}

impl TrailGateway {
    pub fn new(api: Arc<dyn RawApiPort>, timeout_ms: u64) -> Self {
        Self {
            api,
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            timeout_ms,
        }
    }

    pub fn with_chat_path(mut self, chat_path: impl Into<String>) -> Self {
        self.chat_path = chat_path.into();
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Race `call` against the configured deadline.
    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        match tokio::time::timeout(Duration::from_millis(self.timeout_ms), call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation = operation,
                    timeout_ms = self.timeout_ms,
                    "Gateway call timed out"
                );
                Err(GatewayError::Timeout {
                    operation,
                    timeout_ms: self.timeout_ms,
                })
            }
        }
    }
}

/// Append the session query string to an endpoint path.
fn with_query(path: &str, query: &TrailQuery) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.pairs())
        .finish();
    format!("{}?{}", path, encoded)
}

fn parse_body<T: DeserializeOwned>(operation: &str, value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::Protocol(format!("{} response: {}", operation, e)))
}

fn to_body<T: serde::Serialize>(request: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(request).map_err(|e| GatewayError::Protocol(e.to_string()))
}

#[async_trait::async_trait]
impl TrailGatewayPort for TrailGateway {
    async fn fetch_next(
        &self,
        session: &SessionContext,
        debug: bool,
    ) -> Result<NextStep, GatewayError> {
        let path = with_query(NEXT_TASK_PATH, &TrailQuery::from_session(session));
        let body = to_body(&NextTaskRequest::from_session(session, debug))?;

        let response: NextTaskResponse = self
            .guarded("fetch_next", async {
                let value = self.api.post_json(&path, &body).await?;
                parse_body("fetch_next", value)
            })
            .await?;

        let task = match response.task {
            Some(Value::Null) | None => None,
            Some(raw) => Some(decode_task(raw).map_err(|e| match e {
                TaskDecodeError::UnknownType { tag } => GatewayError::UnroutableTask { tag },
                other => GatewayError::Protocol(other.to_string()),
            })?),
        };

        tracing::info!(
            user_id = %session.user_id(),
            trail_ref = %session.trail_ref(),
            task_type = ?task.as_ref().map(|t| t.task_type()),
            has_outcome = response.outcome.is_some(),
            "Fetched next task"
        );

        Ok(NextStep {
            task,
            outcome: response.outcome,
        })
    }

    async fn fetch_markers(&self, session: &SessionContext) -> Result<Vec<Marker>, GatewayError> {
        let path = with_query(MAP_PATH, &TrailQuery::from_session(session));

        let response: MarkersResponse = self
            .guarded("fetch_markers", async {
                let value = self.api.get_json(&path).await?;
                parse_body("fetch_markers", value)
            })
            .await?;

        if !response.ok {
            return Err(GatewayError::Protocol(
                "marker request rejected by backend".to_string(),
            ));
        }

        tracing::debug!(count = response.markers.len(), "Fetched map markers");
        Ok(response.markers)
    }

    async fn post_chat_message(
        &self,
        session: &SessionContext,
        text: &str,
    ) -> Result<ChatReply, GatewayError> {
        let body = to_body(&ChatMessageRequest::from_session(session, text))?;

        let response: ChatMessageResponse = self
            .guarded("post_chat_message", async {
                let value = self.api.post_json(&self.chat_path, &body).await?;
                parse_body("post_chat_message", value)
            })
            .await?;

        if !response.ok {
            return Err(GatewayError::Protocol(
                "chat message rejected by backend".to_string(),
            ));
        }

        Ok(ChatReply {
            message: response.message,
            items: response.items,
            energy: response.energy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{ApiError, MockRawApiPort};
    use serde_json::json;
    use trailhunt_domain::TaskType;

    fn session() -> SessionContext {
        SessionContext::new("42", "DragonReturn_Brandon").unwrap()
    }

    /// Backend that accepts the request and never answers.
    struct StalledApi;

    #[async_trait::async_trait]
    impl RawApiPort for StalledApi {
        async fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            std::future::pending().await
        }

        async fn post_json(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_fetch_next_sends_session_in_body_and_query() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json()
            .withf(|path, body| {
                path == "/api/next?user_id=42&trail_ref=DragonReturn_Brandon"
                    && *body
                        == json!({"user_id": "42", "trail_ref": "DragonReturn_Brandon", "debug": true})
            })
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "task": {"type": "Marker", "lat": 1.0, "lng": 2.0},
                    "outcome": {"sentiment": "Positive", "title": "Yes", "subtitle": "", "items": [{"name": "Key"}]}
                }))
            });

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        let step = gateway.fetch_next(&session(), true).await.unwrap();

        assert_eq!(step.task.unwrap().task_type(), TaskType::Marker);
        assert_eq!(step.outcome.unwrap().items[0].name, "Key");
    }

    #[tokio::test]
    async fn test_fetch_next_without_task_is_complete_not_error() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json().returning(|_, _| Ok(json!({})));

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        let step = gateway.fetch_next(&session(), false).await.unwrap();
        assert_eq!(
            step,
            NextStep {
                task: None,
                outcome: None
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_next_null_task_is_complete() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json()
            .returning(|_, _| Ok(json!({"task": null})));

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        assert!(gateway.fetch_next(&session(), false).await.unwrap().task.is_none());
    }

    #[tokio::test]
    async fn test_fetch_next_unknown_tag_is_unroutable() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json()
            .returning(|_, _| Ok(json!({"task": {"type": "Puzzle"}})));

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        let err = gateway.fetch_next(&session(), false).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::UnroutableTask {
                tag: "Puzzle".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_next_malformed_body_is_protocol_error() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json()
            .returning(|_, _| Ok(json!({"outcome": "not an object"})));

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        let err = gateway.fetch_next(&session(), false).await.unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_stalled_call_times_out() {
        let gateway = TrailGateway::new(Arc::new(StalledApi), 20);
        let err = gateway.fetch_next(&session(), false).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Timeout {
                operation: "fetch_next",
                timeout_ms: 20
            }
        );
    }

    #[tokio::test]
    async fn test_immediate_failure_is_transport_not_timeout() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json()
            .returning(|_, _| Err(ApiError::RequestFailed("connection refused".into())));

        let gateway = TrailGateway::new(Arc::new(api), 20);
        let err = gateway.fetch_next(&session(), false).await.unwrap_err();
        assert_eq!(err, GatewayError::Transport("connection refused".into()));
    }

    #[tokio::test]
    async fn test_fetch_markers() {
        let mut api = MockRawApiPort::new();
        api.expect_get_json()
            .withf(|path| path == "/api/map?user_id=42&trail_ref=DragonReturn_Brandon")
            .returning(|_| {
                Ok(json!({"ok": true, "markers": [
                    {"lat": 1.0, "lng": 2.0, "colour": "red"},
                    {"lat": 3.0, "lng": 4.0, "colour": "blue", "title": "Gate"}
                ]}))
            });

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        let markers = gateway.fetch_markers(&session()).await.unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].title.as_deref(), Some("Gate"));
    }

    #[tokio::test]
    async fn test_fetch_markers_not_ok() {
        let mut api = MockRawApiPort::new();
        api.expect_get_json()
            .returning(|_| Ok(json!({"ok": false, "markers": []})));

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        assert!(matches!(
            gateway.fetch_markers(&session()).await.unwrap_err(),
            GatewayError::Protocol(_)
        ));
    }

    #[tokio::test]
    async fn test_fetch_markers_times_out() {
        let gateway = TrailGateway::new(Arc::new(StalledApi), 10);
        assert!(matches!(
            gateway.fetch_markers(&session()).await.unwrap_err(),
            GatewayError::Timeout {
                operation: "fetch_markers",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_post_chat_message_uses_configured_path() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json()
            .withf(|path, body| {
                path == "/custom/chat"
                    && body["message"] == "hello"
                    && body["user_id"] == "42"
                    && body["trail_ref"] == "DragonReturn_Brandon"
            })
            .returning(|_, _| {
                Ok(json!({"ok": true, "message": "Greetings", "items": [{"name": "Scroll"}], "energy": 7}))
            });

        let gateway = TrailGateway::new(Arc::new(api), 1_000).with_chat_path("/custom/chat");
        let reply = gateway.post_chat_message(&session(), "hello").await.unwrap();
        assert_eq!(reply.message, "Greetings");
        assert_eq!(reply.items[0].name, "Scroll");
        assert_eq!(reply.energy, Some(7));
    }

    #[tokio::test]
    async fn test_http_status_is_transport() {
        let mut api = MockRawApiPort::new();
        api.expect_post_json().returning(|_, _| {
            Err(ApiError::HttpStatus {
                status: 503,
                body: "down".into(),
            })
        });

        let gateway = TrailGateway::new(Arc::new(api), 1_000);
        let err = gateway.post_chat_message(&session(), "hi").await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[test]
    fn test_with_query_encodes_values() {
        let query = TrailQuery {
            user_id: "a b".to_string(),
            trail_ref: "x&y".to_string(),
        };
        assert_eq!(
            with_query("/api/map", &query),
            "/api/map?user_id=a+b&trail_ref=x%26y"
        );
    }
}
