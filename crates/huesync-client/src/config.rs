//! Configuration for the theme sync client

use std::path::PathBuf;

/// Configuration for a [`ThemeSyncClient`](crate::ThemeSyncClient)
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the owner service
    pub owner_base_url: String,
    /// Path of the local fallback cache file
    pub cache_path: PathBuf,
    /// Change-event broadcast channel capacity
    pub event_channel_capacity: usize,
    /// Best-effort persistence queue capacity
    pub sync_queue_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            owner_base_url: "http://localhost:5001".to_string(),
            cache_path: PathBuf::from("./huesync-data/theme"),
            event_channel_capacity: 64,
            sync_queue_capacity: 16,
        }
    }
}

impl SyncConfig {
    /// Create a configuration for a specific owner service
    pub fn with_owner_base_url(owner_base_url: impl Into<String>) -> Self {
        Self {
            owner_base_url: owner_base_url.into(),
            ..Self::default()
        }
    }

    /// Set the cache file path
    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    /// Set the change-event channel capacity
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    /// Set the persistence queue capacity
    pub fn with_sync_queue_capacity(mut self, capacity: usize) -> Self {
        self.sync_queue_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = SyncConfig::with_owner_base_url("http://owner:5001")
            .with_cache_path("/tmp/theme")
            .with_sync_queue_capacity(4);

        assert_eq!(config.owner_base_url, "http://owner:5001");
        assert_eq!(config.cache_path, PathBuf::from("/tmp/theme"));
        assert_eq!(config.sync_queue_capacity, 4);
        assert_eq!(config.event_channel_capacity, 64);
    }
}
