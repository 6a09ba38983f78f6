use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// One uploaded original file and the root of all its derived artifacts.
///
/// The identifier doubles as the storage directory name: every path for the
/// original and its conversions derives from it, so it must never change
/// after creation. Conversions are additive blobs keyed off this record and
/// never mutate it; whether a conversion exists is determined solely by the
/// presence of a blob at its derived path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: Uuid,
    pub name: String,
    pub file_name: String,
    /// Storage backend identifier the original and its conversions live on.
    pub disk: String,
    pub content_type: String,
    pub file_size: i64,
    /// Caller-supplied attributes, persisted opaquely alongside the record.
    pub attributes: Map<String, JsonValue>,
    pub uploaded_at: DateTime<Utc>,
}

impl Media {
    /// File extension, derived from the file name.
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }

    /// Coarse media category: the content type prefix before `/`.
    pub fn kind(&self) -> &str {
        self.content_type.split('/').next().unwrap_or("")
    }

    pub fn is_of_kind(&self, kind: &str) -> bool {
        self.kind() == kind
    }

    /// Root directory for the original and all derived files.
    pub fn directory(&self) -> String {
        self.id.to_string()
    }

    /// Storage key for the original (empty conversion name) or for a named
    /// conversion of it.
    ///
    /// Conversion outputs reuse the original file name unchanged, extension
    /// included, even when the transform changes the encoded format; external
    /// URL consumers rely on the stable naming.
    pub fn storage_path(&self, conversion: &str) -> String {
        let mut directory = self.directory();

        if !conversion.is_empty() {
            directory.push_str("/conversions/");
            directory.push_str(conversion);
        }

        format!("{}/{}", directory, self.file_name)
    }
}

/// Insert payload for the record store. The store assigns the identifier and
/// upload timestamp.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub name: String,
    pub file_name: String,
    pub disk: String,
    pub content_type: String,
    pub file_size: i64,
    pub attributes: Map<String, JsonValue>,
}

/// Replace characters that are unsafe in storage keys (`#`, `/`, `\` and
/// space) with `-`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name.replace(['#', '/', '\\', ' '], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(file_name: &str, content_type: &str) -> Media {
        Media {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            file_name: file_name.to_string(),
            disk: "local".to_string(),
            content_type: content_type.to_string(),
            file_size: 1024,
            attributes: Map::new(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn storage_path_for_original() {
        let media = media("cat.jpg", "image/jpeg");
        assert_eq!(media.storage_path(""), format!("{}/cat.jpg", media.id));
    }

    #[test]
    fn storage_path_for_conversion() {
        let media = media("cat.jpg", "image/jpeg");
        assert_eq!(
            media.storage_path("thumb"),
            format!("{}/conversions/thumb/cat.jpg", media.id)
        );
    }

    #[test]
    fn conversion_path_keeps_original_extension() {
        let media = media("photo.png", "image/png");
        assert!(media.storage_path("webp-preview").ends_with("/photo.png"));
    }

    #[test]
    fn directory_is_the_identifier() {
        let media = media("cat.jpg", "image/jpeg");
        assert_eq!(media.directory(), media.id.to_string());
    }

    #[test]
    fn extension_from_file_name() {
        assert_eq!(media("cat.jpg", "image/jpeg").extension(), "jpg");
        assert_eq!(media("archive.tar.gz", "application/gzip").extension(), "gz");
        assert_eq!(media("README", "text/plain").extension(), "");
    }

    #[test]
    fn kind_is_content_type_prefix() {
        assert_eq!(media("cat.jpg", "image/jpeg").kind(), "image");
        assert_eq!(media("talk.mp3", "audio/mpeg").kind(), "audio");
        assert!(media("cat.jpg", "image/jpeg").is_of_kind("image"));
        assert!(!media("talk.mp3", "audio/mpeg").is_of_kind("image"));
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("My Photo.png"), "My-Photo.png");
        assert_eq!(sanitize_file_name("a/b\\c d.txt"), "a-b-c-d.txt");
        // Adjacent substitutions are not collapsed.
        assert_eq!(sanitize_file_name("My Photo #1.png"), "My-Photo--1.png");
    }
}
