//! Disk resolution.
//!
//! Media items record the name of the disk they live on; the [`DiskManager`]
//! maps those names to configured storage backends. Registration is
//! last-write-wins and happens once at setup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::{Storage, StorageError, StorageResult};

#[derive(Default)]
pub struct DiskManager {
    disks: HashMap<String, Arc<dyn Storage>>,
}

impl DiskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a storage backend to a disk name, replacing any earlier binding.
    pub fn register(&mut self, name: impl Into<String>, storage: Arc<dyn Storage>) {
        self.disks.insert(name.into(), storage);
    }

    /// Resolve a disk by name.
    pub fn disk(&self, name: &str) -> StorageResult<Arc<dyn Storage>> {
        self.disks
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::ConfigError(format!("Unknown disk: {}", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.disks.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::StorageBackend;

    #[test]
    fn resolves_registered_disks() {
        let mut disks = DiskManager::new();
        disks.register("local", Arc::new(MemoryStorage::new()));

        assert!(disks.contains("local"));
        assert_eq!(
            disks.disk("local").unwrap().backend_type(),
            StorageBackend::Memory
        );
    }

    #[test]
    fn unknown_disk_is_a_config_error() {
        let disks = DiskManager::new();

        let result = disks.disk("s3");
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut disks = DiskManager::new();
        disks.register("media", Arc::new(MemoryStorage::new()));

        let replacement = Arc::new(MemoryStorage::with_base_url("memory://other".to_string()));
        disks.register("media", replacement);

        assert_eq!(
            disks.disk("media").unwrap().url("42/cat.jpg"),
            "memory://other/42/cat.jpg"
        );
    }
}
