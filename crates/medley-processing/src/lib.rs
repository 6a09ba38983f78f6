//! Medley Processing Library
//!
//! The derived-artifact pipeline: a registry of named image transforms, an
//! executor that applies them once per artifact and persists the results, the
//! image codec boundary, the optional artifact optimizer, and the upload
//! coordinator that brings originals into the system.

pub mod codec;
pub mod error;
pub mod executor;
pub mod optimizer;
pub mod registry;
pub mod upload;

// Re-export commonly used types
pub use error::{ConversionError, ConversionResult};
pub use executor::ConversionExecutor;
pub use optimizer::{CommandOptimizer, ImageOptimizer};
pub use registry::{Conversion, ConversionRegistry};
pub use upload::{MediaUploader, UploadError, UploadRequest, UploadedFile};
