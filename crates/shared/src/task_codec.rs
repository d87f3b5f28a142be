//! Decoding raw task payloads.
//!
//! The backend can add task types before the player knows about them. Decoding
//! first classifies the `type` tag, so a payload with an unknown tag surfaces
//! as [`TaskDecodeError::UnknownType`] rather than a generic parse failure.

use serde_json::Value;
use thiserror::Error;
use trailhunt_domain::{Task, TaskType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskDecodeError {
    /// Payload is not an object or carries no string `type`
    #[error("task payload has no type tag")]
    MissingType,
    /// Tag is not one the player can route
    #[error("unknown task type: {tag}")]
    UnknownType { tag: String },
    /// Tag is known but the variant's fields are missing or malformed
    #[error("malformed {tag} task: {message}")]
    Malformed { tag: TaskType, message: String },
}

/// Read the raw `type` tag of a task payload.
pub fn task_tag(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

/// Decode a task payload into the typed model.
pub fn decode_task(value: Value) -> Result<Task, TaskDecodeError> {
    let tag = task_tag(&value).ok_or(TaskDecodeError::MissingType)?;
    let task_type: TaskType = match tag.parse() {
        Ok(task_type) => task_type,
        Err(_) => {
            tracing::warn!(tag = %tag, "Received task with unknown type tag");
            return Err(TaskDecodeError::UnknownType {
                tag: tag.to_string(),
            });
        }
    };

    serde_json::from_value(value).map_err(|e| TaskDecodeError::Malformed {
        tag: task_type,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_known_task() {
        let task = decode_task(json!({"type": "Information", "content": "Welcome"})).unwrap();
        assert_eq!(task.task_type(), TaskType::Information);
        assert_eq!(task.content(), Some("Welcome"));
    }

    #[test]
    fn test_decode_unknown_tag() {
        let err = decode_task(json!({"type": "Puzzle", "content": "?"})).unwrap_err();
        assert_eq!(
            err,
            TaskDecodeError::UnknownType {
                tag: "Puzzle".to_string()
            }
        );
    }

    #[test]
    fn test_decode_missing_tag() {
        assert_eq!(
            decode_task(json!({"content": "no tag"})).unwrap_err(),
            TaskDecodeError::MissingType
        );
        assert_eq!(
            decode_task(json!("Marker")).unwrap_err(),
            TaskDecodeError::MissingType
        );
    }

    #[test]
    fn test_decode_malformed_variant() {
        // Marker needs lat/lng
        let err = decode_task(json!({"type": "Marker", "title": "Oak"})).unwrap_err();
        assert!(matches!(
            err,
            TaskDecodeError::Malformed {
                tag: TaskType::Marker,
                ..
            }
        ));
    }

    #[test]
    fn test_every_declared_tag_decodes() {
        for tag in TaskType::ALL {
            let payload = match tag {
                TaskType::Marker => json!({"type": tag.as_str(), "lat": 0.0, "lng": 0.0}),
                _ => json!({"type": tag.as_str()}),
            };
            assert_eq!(decode_task(payload).unwrap().task_type(), tag);
        }
    }
}
