//! Response envelopes returned by the trail backend.

use serde::{Deserialize, Serialize};
use trailhunt_domain::{InventoryItem, Marker, Outcome};

/// `200` body of `POST /api/next`.
///
/// `task` is kept as raw JSON so an unrecognised `type` tag can be reported
/// as such instead of failing the whole envelope. A missing `task` means the
/// trail is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NextTaskResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

/// Body of `GET /api/map`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkersResponse {
    pub ok: bool,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

/// Body returned by the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub energy: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailhunt_domain::Sentiment;

    #[test]
    fn test_next_task_response_without_task_means_complete() {
        let response: NextTaskResponse = serde_json::from_str("{}").unwrap();
        assert!(response.task.is_none());
        assert!(response.outcome.is_none());
    }

    #[test]
    fn test_next_task_response_with_outcome() {
        let json = r#"{
            "task": {"type": "Marker", "lat": 1.0, "lng": 2.0},
            "outcome": {"sentiment": "Positive", "title": "Nice", "subtitle": "", "items": [{"name": "Key"}]}
        }"#;
        let response: NextTaskResponse = serde_json::from_str(json).unwrap();
        let outcome = response.outcome.unwrap();
        assert_eq!(outcome.sentiment, Sentiment::Positive);
        assert_eq!(outcome.items[0].name, "Key");
        assert_eq!(response.task.unwrap()["type"], "Marker");
    }

    #[test]
    fn test_chat_response_defaults() {
        let response: ChatMessageResponse =
            serde_json::from_str(r#"{"ok": true, "message": "Hello"}"#).unwrap();
        assert!(response.ok);
        assert!(response.items.is_empty());
        assert_eq!(response.energy, None);
    }

    #[test]
    fn test_markers_response() {
        let json = r##"{"ok": true, "markers": [{"lat": 1.5, "lng": -2.0, "colour": "#00f", "title": "Gate"}]}"##;
        let response: MarkersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.markers.len(), 1);
        assert_eq!(response.markers[0].title.as_deref(), Some("Gate"));
    }
}
