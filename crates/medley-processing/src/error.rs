use medley_storage::StorageError;
use thiserror::Error;

/// Conversion pipeline errors.
///
/// `UnknownConversion` and `SourceNotFound` abort the in-progress batch
/// immediately; artifacts written by earlier requests in the batch stay
/// persisted. Storage and codec failures pass through unreclassified.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No transform is registered under the requested name. A caller
    /// configuration error; not retryable without fixing the registry.
    #[error("Unknown conversion: {0}")]
    UnknownConversion(String),

    /// The original blob is missing from storage, indicating an
    /// upload/storage inconsistency.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Transform failed: {0}")]
    Transform(#[source] anyhow::Error),
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
