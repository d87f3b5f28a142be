//! Platform DI Container
//!
//! This module provides the `Platform` struct - a dependency injection container
//! that aggregates platform-specific service implementations behind port traits.
//!
//! Usage:
//! - Created by `create_platform()` in infrastructure/platform/desktop.rs
//!   (or `create_mock_platform()` in tests)
//! - Handed to application services such as `SettingsService`

use std::sync::Arc;

use crate::ports::outbound::StorageProvider;

/// Unified platform services container
#[derive(Clone)]
pub struct Platform {
    storage: Arc<dyn StorageProviderDyn>,
}

// =============================================================================
// Dynamic trait versions for Arc storage
// =============================================================================

trait StorageProviderDyn: Send + Sync {
    fn save(&self, key: &str, value: &str);
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

// =============================================================================
// Blanket implementations - convert port traits to dyn-safe wrappers
// =============================================================================

impl<T: StorageProvider + Send + Sync> StorageProviderDyn for T {
    fn save(&self, key: &str, value: &str) {
        StorageProvider::save(self, key, value)
    }
    fn load(&self, key: &str) -> Option<String> {
        StorageProvider::load(self, key)
    }
    fn remove(&self, key: &str) {
        StorageProvider::remove(self, key)
    }
}

impl Platform {
    pub fn new<S>(storage: S) -> Self
    where
        S: StorageProvider + Send + Sync,
    {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn storage_save(&self, key: &str, value: &str) {
        self.storage.save(key, value);
    }

    pub fn storage_load(&self, key: &str) -> Option<String> {
        self.storage.load(key)
    }

    pub fn storage_remove(&self, key: &str) {
        self.storage.remove(key);
    }
}
