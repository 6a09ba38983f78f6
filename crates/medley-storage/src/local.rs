use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{Storage, StorageError, StorageResult, Visibility};
use crate::StorageBackend;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/medley/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.starts_with('/')
            || key.split('/').any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key must be relative and traversal-free: {}",
                key
            )));
        }

        Ok(self.base_path.join(key))
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_blob(&self, key: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.key_to_path(key)?;

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(path)
    }

    #[cfg(unix)]
    async fn apply_visibility(path: &Path, visibility: Visibility) -> StorageResult<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = match visibility {
            Visibility::Public => 0o644,
            Visibility::Private => 0o600,
        };

        fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to set permissions on {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    #[cfg(not(unix))]
    async fn apply_visibility(_path: &Path, _visibility: Visibility) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let size = data.len();
        let start = std::time::Instant::now();

        let path = self.write_blob(key, &data).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put successful"
        );

        Ok(())
    }

    async fn put_file(
        &self,
        directory: &str,
        file_name: &str,
        data: Bytes,
        visibility: Visibility,
    ) -> StorageResult<String> {
        let key = format!("{}/{}", directory, file_name);
        let size = data.len();
        let start = std::time::Instant::now();

        let path = self.write_blob(&key, &data).await?;
        Self::apply_visibility(&path, visibility).await?;

        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            visibility = visibility.as_str(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put_file successful"
        );

        Ok(url)
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), key = %key, "Local storage delete successful");

        Ok(())
    }

    fn absolute_path(&self, key: &str) -> StorageResult<PathBuf> {
        self.key_to_path(key)
    }

    fn url(&self, key: &str) -> String {
        self.generate_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_and_download() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let data = Bytes::from_static(b"test data");
        storage.put("42/cat.jpg", data.clone()).await.unwrap();

        let downloaded = storage.download("42/cat.jpg").await.unwrap();
        assert_eq!(data, downloaded);
    }

    #[tokio::test]
    async fn test_put_file_returns_url() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let url = storage
            .put_file(
                "42",
                "cat.jpg",
                Bytes::from_static(b"image bytes"),
                Visibility::Public,
            )
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/media/42/cat.jpg");
        assert!(storage.exists("42/cat.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_nested_conversion_key_creates_directories() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .put("42/conversions/thumb/cat.jpg", Bytes::from_static(b"thumb"))
            .await
            .unwrap();

        assert!(storage.exists("42/conversions/thumb/cat.jpg").await.unwrap());
        assert!(!storage.exists("42/conversions/banner/cat.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_download_missing_blob() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let result = storage.download("42/missing.jpg").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        assert!(storage.delete("nonexistent/file.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_absolute_path_is_under_base() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        let path = storage.absolute_path("42/cat.jpg").unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with("42/cat.jpg"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_private_visibility_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let storage = storage(&dir).await;

        storage
            .put_file(
                "42",
                "secret.jpg",
                Bytes::from_static(b"secret"),
                Visibility::Private,
            )
            .await
            .unwrap();

        let path = storage.absolute_path("42/secret.jpg").unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
