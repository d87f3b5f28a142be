//! Backend endpoint paths, relative to the API base URL.

/// `POST` - next task for the session
pub const NEXT_TASK_PATH: &str = "/api/next";

/// `GET` - markers for the session's map
pub const MAP_PATH: &str = "/api/map";

/// `POST` - chat message; deployments may override this path
pub const DEFAULT_CHAT_PATH: &str = "/api/chat";
