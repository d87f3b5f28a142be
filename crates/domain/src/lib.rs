//! Trailhunt domain types.
//!
//! Pure data and invariants for the trail task engine: the task model, reward
//! outcomes, map markers, positions with great-circle math, and the session
//! context every gateway call is keyed on.

pub mod error;
pub mod geo;
pub mod inventory;
pub mod marker;
pub mod outcome;
pub mod session;
pub mod task;

pub use error::DomainError;
pub use geo::{haversine_distance_m, Position, EARTH_RADIUS_M};
pub use inventory::Inventory;
pub use marker::Marker;
pub use outcome::{InventoryItem, Outcome, Sentiment};
pub use session::{SessionContext, SessionKey, TrailPath};
pub use task::{
    ChatTask, CharacterTask, MapTask, MarkerTask, QuestionTask, Resolution, Task, TaskCommon,
    TaskType,
};
