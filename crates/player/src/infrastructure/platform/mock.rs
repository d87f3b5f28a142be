//! In-memory platform for tests and headless runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::ports::outbound::StorageProvider;
use crate::state::Platform;

/// Storage that lives only as long as the process.
#[derive(Clone, Default)]
pub struct InMemoryStorageProvider {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for InMemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

/// Platform backed entirely by memory.
pub fn create_mock_platform() -> Platform {
    Platform::new(InMemoryStorageProvider::new())
}
