//! Navigation query parameters.
//!
//! The navigation layer carries the session and the dispatched task in the
//! query string so a screen can be rebuilt after a reload without asking the
//! backend again.

use thiserror::Error;
use trailhunt_domain::{DomainError, Position, SessionContext, Task, TrailPath};
use trailhunt_shared::{decode_task, TaskDecodeError};

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Missing query parameter: {0}")]
    Missing(&'static str),
    #[error("Invalid query parameter {field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("No screen registered for task type {tag:?}")]
    UnroutableTask { tag: String },
    #[error(transparent)]
    Session(#[from] DomainError),
}

fn invalid(field: &'static str, message: impl ToString) -> NavigationError {
    NavigationError::Invalid {
        field,
        message: message.to_string(),
    }
}

/// Serialized session plus the echo of the dispatched task.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub user_id: String,
    pub trail_ref: String,
    pub path: TrailPath,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub task: Option<Task>,
    pub task_sequence: Option<u64>,
}

impl QueryParams {
    pub fn from_session(session: &SessionContext) -> Self {
        let position = session.position();
        Self {
            user_id: session.user_id().to_string(),
            trail_ref: session.trail_ref().to_string(),
            path: session.path().clone(),
            lat: position.map(|p| p.lat),
            lng: position.map(|p| p.lng),
            task: None,
            task_sequence: None,
        }
    }

    pub fn with_task(mut self, task: Task, sequence: u64) -> Self {
        self.task = Some(task);
        self.task_sequence = Some(sequence);
        self
    }

    pub fn to_query_string(&self) -> Result<String, NavigationError> {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("user_id", &self.user_id)
            .append_pair("trail_ref", &self.trail_ref);
        if !self.path.is_empty() {
            serializer.append_pair("path", &self.path.to_string());
        }
        if let Some(lat) = self.lat {
            serializer.append_pair("lat", &lat.to_string());
        }
        if let Some(lng) = self.lng {
            serializer.append_pair("lng", &lng.to_string());
        }
        if let Some(task) = &self.task {
            let json = serde_json::to_string(task).map_err(|e| invalid("task", e))?;
            serializer.append_pair("task", &json);
        }
        if let Some(sequence) = self.task_sequence {
            serializer.append_pair("task_sequence", &sequence.to_string());
        }
        Ok(serializer.finish())
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Result<Self, NavigationError> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut user_id = None;
        let mut trail_ref = None;
        let mut path = TrailPath::default();
        let mut lat = None;
        let mut lng = None;
        let mut task = None;
        let mut task_sequence = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "user_id" => user_id = Some(value.into_owned()),
                "trail_ref" => trail_ref = Some(value.into_owned()),
                "path" => path = value.parse()?,
                "lat" => lat = Some(value.parse::<f64>().map_err(|e| invalid("lat", e))?),
                "lng" => lng = Some(value.parse::<f64>().map_err(|e| invalid("lng", e))?),
                "task" => task = Some(parse_task(&value)?),
                "task_sequence" => {
                    task_sequence = Some(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid("task_sequence", e))?,
                    )
                }
                other => tracing::debug!(key = other, "Ignoring unknown query parameter"),
            }
        }

        let params = Self {
            user_id: user_id.ok_or(NavigationError::Missing("user_id"))?,
            trail_ref: trail_ref.ok_or(NavigationError::Missing("trail_ref"))?,
            path,
            lat,
            lng,
            task,
            task_sequence,
        };
        // Reject blank identity the same way a fresh session would
        params.session()?;
        Ok(params)
    }

    /// Rebuild the session snapshot these parameters describe.
    pub fn session(&self) -> Result<SessionContext, NavigationError> {
        let position = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Position::new(lat, lng)?),
            (None, None) => None,
            (Some(_), None) => return Err(NavigationError::Missing("lng")),
            (None, Some(_)) => return Err(NavigationError::Missing("lat")),
        };
        Ok(SessionContext::new(&self.user_id, &self.trail_ref)?
            .with_path(self.path.clone())
            .with_position(position))
    }
}

/// Decode the task echo the same way a backend payload is decoded.
fn parse_task(raw: &str) -> Result<Task, NavigationError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| invalid("task", e))?;
    decode_task(value).map_err(|e| match e {
        TaskDecodeError::UnknownType { tag } => NavigationError::UnroutableTask { tag },
        other => invalid("task", other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionContext {
        SessionContext::new("42", "DragonReturn_Brandon")
            .unwrap()
            .with_path(TrailPath::new(vec![0, 2, 1]))
            .with_position(Some(Position::new(51.45, -2.58).unwrap()))
    }

    #[test]
    fn test_query_string_carries_task_echo() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "type": "Marker", "lat": 51.4545, "lng": -2.5879, "title": "Old Gate"
        }))
        .unwrap();
        let params = QueryParams::from_session(&session()).with_task(task.clone(), 3);

        let query = params.to_query_string().unwrap();
        assert!(query.starts_with("user_id=42&trail_ref=DragonReturn_Brandon&path=0%2C2%2C1"));

        let parsed = QueryParams::parse(&format!("?{}", query)).unwrap();
        assert_eq!(parsed.task, Some(task));
        assert_eq!(parsed.task_sequence, Some(3));
        assert_eq!(parsed.path.steps(), &[0, 2, 1]);
        assert_eq!(parsed.session().unwrap(), session());
    }

    #[test]
    fn test_parse_requires_identity() {
        let err = QueryParams::parse("trail_ref=abc").unwrap_err();
        assert!(matches!(err, NavigationError::Missing("user_id")));

        let err = QueryParams::parse("user_id=%20&trail_ref=abc").unwrap_err();
        assert!(matches!(err, NavigationError::Session(_)));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        let err = QueryParams::parse("user_id=1&trail_ref=t&lat=north").unwrap_err();
        assert!(matches!(err, NavigationError::Invalid { field: "lat", .. }));

        let err = QueryParams::parse("user_id=1&trail_ref=t&path=1,x").unwrap_err();
        assert!(matches!(err, NavigationError::Session(DomainError::Parse(_))));

        let err = QueryParams::parse("user_id=1&trail_ref=t&lat=51.0").unwrap_err();
        assert!(matches!(err, NavigationError::Missing("lng")));
    }

    #[test]
    fn test_unknown_task_tag_is_unroutable() {
        let query = format!(
            "user_id=1&trail_ref=t&task={}",
            url::form_urlencoded::byte_serialize(br#"{"type":"Puzzle"}"#).collect::<String>()
        );
        let err = QueryParams::parse(&query).unwrap_err();
        assert!(matches!(err, NavigationError::UnroutableTask { ref tag } if tag == "Puzzle"));

        let err = QueryParams::parse("user_id=1&trail_ref=t&task=%7B%7D").unwrap_err();
        assert!(matches!(err, NavigationError::Invalid { field: "task", .. }));
    }

    #[test]
    fn test_minimal_query() {
        let parsed = QueryParams::parse("user_id=1&trail_ref=t&utm_source=x").unwrap();
        assert!(parsed.task.is_none());
        assert!(parsed.path.is_empty());
        assert_eq!(parsed.session().unwrap().position(), None);
    }
}
