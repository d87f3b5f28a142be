//! Platform abstraction ports
//!
//! Platform-specific code (file locations, browser storage) is isolated behind
//! these traits so application code stays testable with in-memory stand-ins.
//!
//! NOTE: The `Platform` struct (DI container) that aggregates these traits
//! lives in `state/platform.rs`. Ports contain only trait definitions.

/// Persistent storage abstraction (file-based on desktop)
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Storage key constants
///
/// The debug flag is the only durable state the engine owns.
pub mod storage_keys {
    pub const DEBUG_MODE: &str = "trailhunt_debug";
}
