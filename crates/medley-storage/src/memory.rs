//! In-memory storage backend.
//!
//! Keeps blobs in a map, for tests and embedded use without persistence.
//! Read and write counters are exposed so tests can assert that cache-hit
//! paths perform no blob I/O.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::traits::{Storage, StorageError, StorageResult, Visibility};
use crate::StorageBackend;

pub struct MemoryStorage {
    files: Mutex<HashMap<String, Bytes>>,
    base_url: String,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_base_url("memory://media".to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            base_url,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of blob reads performed. Existence checks are not reads.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of blob writes performed.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seed a blob directly (for test setup).
    pub fn set_file(&self, key: &str, data: impl Into<Bytes>) {
        self.files.lock().unwrap().insert(key.to_string(), data.into());
    }

    /// Blob contents, if present (for test assertions).
    pub fn get_file(&self, key: &str) -> Option<Bytes> {
        self.files.lock().unwrap().get(key).cloned()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn put_file(
        &self,
        directory: &str,
        file_name: &str,
        data: Bytes,
        _visibility: Visibility,
    ) -> StorageResult<String> {
        let key = format!("{}/{}", directory, file_name);
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().insert(key.clone(), data);
        Ok(self.url(&key))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(key)
            .map(|data| data.to_vec())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(key))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.files.lock().unwrap().remove(key);
        Ok(())
    }

    fn absolute_path(&self, key: &str) -> StorageResult<PathBuf> {
        Err(StorageError::ConfigError(format!(
            "Memory storage has no filesystem path for key: {}",
            key
        )))
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_download_roundtrip() {
        let storage = MemoryStorage::new();

        storage
            .put("42/cat.jpg", Bytes::from_static(b"bytes"))
            .await
            .unwrap();

        assert_eq!(storage.download("42/cat.jpg").await.unwrap(), b"bytes");
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.read_count(), 1);
    }

    #[tokio::test]
    async fn test_exists_does_not_count_as_read() {
        let storage = MemoryStorage::new();
        storage.set_file("42/cat.jpg", Bytes::from_static(b"bytes"));

        assert!(storage.exists("42/cat.jpg").await.unwrap());
        assert!(!storage.exists("42/dog.jpg").await.unwrap());
        assert_eq!(storage.read_count(), 0);
    }

    #[tokio::test]
    async fn test_download_missing_blob() {
        let storage = MemoryStorage::new();

        let result = storage.download("nope").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_no_absolute_paths() {
        let storage = MemoryStorage::new();

        let result = storage.absolute_path("42/cat.jpg");
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_url_generation() {
        let storage = MemoryStorage::with_base_url("https://cdn.example.com/".to_string());
        assert_eq!(
            storage.url("42/cat.jpg"),
            "https://cdn.example.com/42/cat.jpg"
        );
    }
}
