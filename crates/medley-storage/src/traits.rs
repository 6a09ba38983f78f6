//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob-store backends must
//! implement, plus the media-aware resolution helpers layered on top of it.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use medley_core::{Media, StorageBackend};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob visibility at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Blob-store abstraction.
///
/// Writes are atomic per key: concurrent writers to the same key do not
/// corrupt the blob, the last writer wins. See the crate root documentation
/// for the key format.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a blob at the given key, replacing any existing blob.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Write a blob at `{directory}/{file_name}`, honouring the visibility
    /// flag. Returns the public URL for the written blob.
    async fn put_file(
        &self,
        directory: &str,
        file_name: &str,
        data: Bytes,
        visibility: Visibility,
    ) -> StorageResult<String>;

    /// Read a blob by key. Fails with [`StorageError::NotFound`] when absent.
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Check whether a blob exists at the given key.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete a blob. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Absolute filesystem path for a key, for backends that have one.
    /// Backends without a filesystem return [`StorageError::ConfigError`].
    fn absolute_path(&self, key: &str) -> StorageResult<PathBuf>;

    /// Public URL for a key. Recomputed per call; never cached.
    fn url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Media-aware resolution over any storage backend: path, URL, and
/// conversion-existence lookups keyed by a media entity.
#[async_trait]
pub trait MediaStorageExt {
    /// Public URL of the original (`conversion = ""`) or a named conversion.
    fn media_url(&self, media: &Media, conversion: &str) -> String;

    /// Absolute filesystem path of the original or a named conversion.
    fn media_path(&self, media: &Media, conversion: &str) -> StorageResult<PathBuf>;

    /// Whether a derived artifact exists for the given conversion name.
    async fn has_conversion(&self, media: &Media, conversion: &str) -> StorageResult<bool>;
}

#[async_trait]
impl<S: Storage + ?Sized> MediaStorageExt for S {
    fn media_url(&self, media: &Media, conversion: &str) -> String {
        self.url(&media.storage_path(conversion))
    }

    fn media_path(&self, media: &Media, conversion: &str) -> StorageResult<PathBuf> {
        self.absolute_path(&media.storage_path(conversion))
    }

    async fn has_conversion(&self, media: &Media, conversion: &str) -> StorageResult<bool> {
        self.exists(&media.storage_path(conversion)).await
    }
}
