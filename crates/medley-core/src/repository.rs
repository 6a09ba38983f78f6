//! Record-store boundary.
//!
//! The store assigns each media item its identifier at create time; the
//! identifier is immutable afterwards and is the sole key all storage paths
//! derive from. Conversions never touch the record — they exist purely as
//! blobs at derived paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Media, NewMedia};

/// Record store operation errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Media not found: {0}")]
    NotFound(Uuid),

    #[error("Record store error: {0}")]
    Backend(String),
}

/// Result type for record store operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Create a record, assigning the identifier and upload timestamp.
    /// Caller-supplied attributes are persisted as given, without validation.
    async fn create(&self, new_media: NewMedia) -> RepositoryResult<Media>;

    async fn find(&self, id: Uuid) -> RepositoryResult<Media>;

    /// Persist updated attributes for an existing record.
    async fn save(&self, media: &Media) -> RepositoryResult<()>;
}

/// In-memory record store, for tests and embedded use.
#[derive(Default)]
pub struct InMemoryMediaRepository {
    records: Mutex<HashMap<Uuid, Media>>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn create(&self, new_media: NewMedia) -> RepositoryResult<Media> {
        let media = Media {
            id: Uuid::new_v4(),
            name: new_media.name,
            file_name: new_media.file_name,
            disk: new_media.disk,
            content_type: new_media.content_type,
            file_size: new_media.file_size,
            attributes: new_media.attributes,
            uploaded_at: Utc::now(),
        };

        self.records
            .lock()
            .unwrap()
            .insert(media.id, media.clone());

        Ok(media)
    }

    async fn find(&self, id: Uuid) -> RepositoryResult<Media> {
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn save(&self, media: &Media) -> RepositoryResult<()> {
        let mut records = self.records.lock().unwrap();

        if !records.contains_key(&media.id) {
            return Err(RepositoryError::NotFound(media.id));
        }

        records.insert(media.id, media.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn new_media() -> NewMedia {
        NewMedia {
            name: "cat".to_string(),
            file_name: "cat.jpg".to_string(),
            disk: "local".to_string(),
            content_type: "image/jpeg".to_string(),
            file_size: 2048,
            attributes: Map::new(),
        }
    }

    #[tokio::test]
    async fn create_assigns_an_identifier() {
        let repository = InMemoryMediaRepository::new();

        let a = repository.create(new_media()).await.unwrap();
        let b = repository.create(new_media()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(repository.find(a.id).await.unwrap().file_name, "cat.jpg");
    }

    #[tokio::test]
    async fn find_missing_record_fails() {
        let repository = InMemoryMediaRepository::new();

        let result = repository.find(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn save_updates_an_existing_record() {
        let repository = InMemoryMediaRepository::new();

        let mut media = repository.create(new_media()).await.unwrap();
        media.name = "renamed".to_string();
        repository.save(&media).await.unwrap();

        assert_eq!(repository.find(media.id).await.unwrap().name, "renamed");
    }
}
