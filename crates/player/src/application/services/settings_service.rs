//! Player settings service
//!
//! The debug flag is the only client state that survives a restart. It is
//! forwarded to the backend on every `fetch_next`.

use crate::ports::outbound::storage_keys;
use crate::state::Platform;

/// Reads and writes persisted player settings.
#[derive(Clone)]
pub struct SettingsService {
    platform: Platform,
}

impl SettingsService {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Whether debug mode is on. Anything other than a stored `"true"` is off.
    pub fn debug_mode(&self) -> bool {
        self.platform
            .storage_load(storage_keys::DEBUG_MODE)
            .is_some_and(|value| value.trim() == "true")
    }

    /// Store the flag. Turning it off forgets the key, since off is the default.
    pub fn set_debug_mode(&self, enabled: bool) {
        tracing::debug!(enabled, "Persisting debug mode");
        if enabled {
            self.platform.storage_save(storage_keys::DEBUG_MODE, "true");
        } else {
            self.platform.storage_remove(storage_keys::DEBUG_MODE);
        }
    }
}
