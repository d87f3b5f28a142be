//! Trailhunt Protocol - Shared types for backend and player communication
//!
//! This crate contains the wire contracts the player speaks to the trail backend:
//! - Endpoint paths
//! - Request bodies and query strings
//! - Response envelopes
//! - Task payload decoding with tag classification
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, thiserror and tracing
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Unknown tags are data** - an unrecognised task `type` is reported, not dropped

pub mod endpoints;
pub mod requests;
pub mod responses;
pub mod task_codec;

pub use endpoints::{DEFAULT_CHAT_PATH, MAP_PATH, NEXT_TASK_PATH};
pub use requests::{ChatMessageRequest, NextTaskRequest, TrailQuery};
pub use responses::{ChatMessageResponse, MarkersResponse, NextTaskResponse};
pub use task_codec::{decode_task, task_tag, TaskDecodeError};
