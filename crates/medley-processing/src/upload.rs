//! Upload coordination.
//!
//! Brings an incoming file into the system: creates the media record (the
//! record store assigns the identifier), then writes the original bytes to
//! storage at `{id}/{file_name}`.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use medley_core::{
    sanitize_file_name, Media, MediaConfig, MediaRepository, NewMedia, RepositoryError,
};
use medley_storage::{DiskManager, StorageError, Visibility};

/// Upload failures surface the underlying record-store or storage error
/// unwrapped; the coordinator performs no error translation of its own.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An incoming file handed to the uploader.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> i64 {
        self.bytes.len() as i64
    }

    /// File name without its extension.
    fn stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name)
    }
}

/// Naming, attributes, and visibility for one upload.
///
/// The display name defaults to the file stem of the incoming name; the
/// stored file name is sanitized at assignment time, so it never contains
/// `#`, `/`, `\` or spaces.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    file: UploadedFile,
    name: String,
    file_name: String,
    attributes: Map<String, JsonValue>,
    visibility: Visibility,
}

impl UploadRequest {
    pub fn from_file(file: UploadedFile) -> Self {
        let name = file.stem().to_string();
        let file_name = sanitize_file_name(&file.file_name);

        Self {
            file,
            name,
            file_name,
            attributes: Map::new(),
            visibility: Visibility::Public,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the stored file name; sanitized on assignment.
    pub fn with_file_name(mut self, file_name: &str) -> Self {
        self.file_name = sanitize_file_name(file_name);
        self
    }

    /// Additional attributes persisted opaquely on the media record.
    pub fn with_attributes(mut self, attributes: Map<String, JsonValue>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Persists upload metadata via the record store and writes the original
/// bytes to the configured disk.
pub struct MediaUploader {
    repository: Arc<dyn MediaRepository>,
    disks: Arc<DiskManager>,
    config: MediaConfig,
}

impl MediaUploader {
    pub fn new(
        repository: Arc<dyn MediaRepository>,
        disks: Arc<DiskManager>,
        config: MediaConfig,
    ) -> Self {
        Self {
            repository,
            disks,
            config,
        }
    }

    /// Create the media record, then write the original file at
    /// `{id}/{file_name}` honouring the visibility flag.
    pub async fn upload(&self, request: UploadRequest) -> Result<Media, UploadError> {
        let UploadRequest {
            file,
            name,
            file_name,
            attributes,
            visibility,
        } = request;

        let storage = self.disks.disk(&self.config.disk)?;

        let media = self
            .repository
            .create(NewMedia {
                name,
                file_name,
                disk: self.config.disk.clone(),
                content_type: file.content_type.clone(),
                file_size: file.size(),
                attributes,
            })
            .await?;

        storage
            .put_file(&media.directory(), &media.file_name, file.bytes, visibility)
            .await?;

        tracing::info!(
            media_id = %media.id,
            file_name = %media.file_name,
            size_bytes = media.file_size,
            disk = %media.disk,
            "Media uploaded"
        );

        Ok(media)
    }
}
