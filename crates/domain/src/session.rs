//! Per-session identity and progress coordinates.
//!
//! A `SessionContext` is an immutable snapshot. Advancing the path or moving
//! the player produces a new context; nothing here mutates in place.

use std::fmt;
use std::str::FromStr;

use crate::{DomainError, Position};

/// Ordered step indices locating the player within a (possibly branching) trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TrailPath(Vec<u32>);

impl TrailPath {
    pub fn new(steps: Vec<u32>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[u32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path with `step` appended.
    pub fn advanced(&self, step: u32) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for TrailPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for step in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", step)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for TrailPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| DomainError::parse(format!("Invalid path step: {:?}", part)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Identifies a session independently of its progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: String,
    pub trail_ref: String,
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.trail_ref)
    }
}

/// Identity + progress coordinates needed to request the next task.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    user_id: String,
    trail_ref: String,
    path: TrailPath,
    position: Option<Position>,
}

impl SessionContext {
    /// Build a context. `user_id` and `trail_ref` must be non-blank.
    pub fn new(user_id: impl Into<String>, trail_ref: impl Into<String>) -> Result<Self, DomainError> {
        let user_id = user_id.into();
        let trail_ref = trail_ref.into();
        if user_id.trim().is_empty() {
            return Err(DomainError::validation("user_id is required"));
        }
        if trail_ref.trim().is_empty() {
            return Err(DomainError::validation("trail_ref is required"));
        }
        Ok(Self {
            user_id,
            trail_ref,
            path: TrailPath::default(),
            position: None,
        })
    }

    pub fn with_path(self, path: TrailPath) -> Self {
        Self { path, ..self }
    }

    pub fn with_position(self, position: Option<Position>) -> Self {
        Self { position, ..self }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn trail_ref(&self) -> &str {
        &self.trail_ref
    }

    pub fn path(&self) -> &TrailPath {
        &self.path
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn session_key(&self) -> SessionKey {
        SessionKey {
            user_id: self.user_id.clone(),
            trail_ref: self.trail_ref.clone(),
        }
    }
}
